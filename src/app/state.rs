//! App state - pure data structure with no I/O logic

use std::collections::VecDeque;

use crate::constants::MAX_ACTIVITY;
use crate::messages::render::Confirmation;
use crate::messages::ui_events::{FriendField, InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{Cluster, Contact, PendingTransaction, TransferRecord};
use crate::storage::AddressBook;
use crate::wallet::pubkey::{Pubkey, Signature};

/// Which screen the user sees
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ViewState {
    #[default]
    Disconnected,
    ConnectedIdle,
    ConnectedWithPopup,
    ConnectedWithConfirmation,
}

/// One-line message for the status bar
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        StatusLine { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusLine { text: text.into(), is_error: true }
    }
}

/// Add-friend popup draft
#[derive(Clone, Debug, Default)]
pub struct FriendDraft {
    pub name: String,
    pub address: String,
    pub field: FriendField,
}

impl FriendDraft {
    pub fn current_mut(&mut self) -> &mut String {
        match self.field {
            FriendField::Name => &mut self.name,
            FriendField::Address => &mut self.address,
        }
    }
}

/// Transfer form fields, as typed
#[derive(Clone, Debug, Default)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Session
    pub cluster: Cluster,
    pub rpc_url: String,
    pub session: Option<Pubkey>,
    pub balance: Option<f64>,

    // Request tracking
    pub next_request_id: u64,
    pub pending_connect_id: Option<u64>,
    pub pending_balance_id: Option<u64>,
    pub pending_transfer: Option<(u64, PendingTransaction)>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Address book
    pub address_book: AddressBook,
    pub selected_friend: usize,
    pub show_add_friend: bool,
    pub friend_draft: FriendDraft,

    // Transfer
    pub form: TransferForm,
    pub tx_sig: Option<Signature>,
    pub activity: VecDeque<TransferRecord>,

    // Status bar
    pub status: Option<StatusLine>,

    // Popups
    pub show_help: bool,
}

impl AppState {
    pub fn new(address_book: AddressBook, cluster: Cluster, rpc_url: impl Into<String>) -> Self {
        AppState {
            cluster,
            rpc_url: rpc_url.into(),
            session: None,
            balance: None,
            next_request_id: 1,
            pending_connect_id: None,
            pending_balance_id: None,
            pending_transfer: None,
            active_panel: Panel::Friends,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            address_book,
            selected_friend: 0,
            show_add_friend: false,
            friend_draft: FriendDraft::default(),
            form: TransferForm::default(),
            tx_sig: None,
            activity: VecDeque::with_capacity(MAX_ACTIVITY),
            status: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Current screen, derived from session and popup state.
    /// The add-friend popup overlays the confirmation banner.
    pub fn view(&self) -> ViewState {
        if self.session.is_none() {
            ViewState::Disconnected
        } else if self.show_add_friend {
            ViewState::ConnectedWithPopup
        } else if self.tx_sig.is_some() {
            ViewState::ConnectedWithConfirmation
        } else {
            ViewState::ConnectedIdle
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        self.address_book.contacts()
    }

    /// Get the transfer form field under focus
    pub fn current_input(&self) -> &str {
        match self.active_panel {
            Panel::Recipient => &self.form.recipient,
            Panel::Amount => &self.form.amount,
            Panel::Friends => "",
        }
    }

    /// Get mutable reference to the focused form field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Recipient => Some(&mut self.form.recipient),
            Panel::Amount => Some(&mut self.form.amount),
            Panel::Friends => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            view: self.view(),
            cluster: self.cluster,
            rpc_url: self.rpc_url.clone(),
            wallet_address: self.session.map(|k| k.to_string()),
            balance: self.balance,
            is_connecting: self.pending_connect_id.is_some(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            friends: self.contacts().to_vec(),
            selected_friend: self.selected_friend,
            friend_name: self.friend_draft.name.clone(),
            friend_address: self.friend_draft.address.clone(),
            friend_field: self.friend_draft.field,
            recipient: self.form.recipient.clone(),
            amount: self.form.amount.clone(),
            is_submitting: self.pending_transfer.is_some(),
            confirmation: self.tx_sig.as_ref().map(|sig| Confirmation {
                signature: sig.to_string(),
                explorer_url: self.cluster.explorer_url(sig),
            }),
            activity: self.activity.clone(),
            status: self.status.clone(),
            show_help: self.show_help,
        }
    }
}
