//! Render state - data structure sent from App layer to UI for rendering

use std::collections::VecDeque;

use crate::app::state::{StatusLine, ViewState};
use crate::messages::ui_events::{FriendField, InputMode, Panel};
use crate::models::{Cluster, Contact, TransferRecord};

/// Confirmation banner contents
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub signature: String,
    pub explorer_url: String,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub view: ViewState,

    // Session
    pub cluster: Cluster,
    pub rpc_url: String,
    pub wallet_address: Option<String>,
    pub balance: Option<f64>,
    pub is_connecting: bool,

    // Focus
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Friends
    pub friends: Vec<Contact>,
    pub selected_friend: usize,

    // Add-friend popup
    pub friend_name: String,
    pub friend_address: String,
    pub friend_field: FriendField,

    // Transfer form
    pub recipient: String,
    pub amount: String,
    pub is_submitting: bool,
    pub confirmation: Option<Confirmation>,

    // Activity log (newest last)
    pub activity: VecDeque<TransferRecord>,

    // Status bar message
    pub status: Option<StatusLine>,

    // Popups
    pub show_help: bool,
}
