//! Command handlers - business logic for processing UI events

use crate::app::state::{AppState, FriendDraft, StatusLine, TransferForm};
use crate::constants::MAX_ACTIVITY;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{lamports_to_sol, Contact, PendingTransaction, TransferOutcome, TransferRecord};
use crate::wallet::pubkey::Pubkey;

impl AppState {
    // ========================
    // Session
    // ========================

    pub fn connect(&mut self) -> Option<NetworkCommand> {
        if self.session.is_some() || self.pending_connect_id.is_some() {
            return None;
        }
        let id = self.next_id();
        self.pending_connect_id = Some(id);
        self.status = Some(StatusLine::info("Connecting wallet..."));
        Some(NetworkCommand::Connect { id })
    }

    /// Drop the session. In-flight balance responses are ignored from here on;
    /// an in-flight transfer still resolves into the activity log.
    pub fn disconnect(&mut self) -> Option<NetworkCommand> {
        if self.session.is_none() {
            return None;
        }
        tracing::info!("Disconnecting wallet");
        self.session = None;
        self.balance = None;
        self.tx_sig = None;
        self.pending_balance_id = None;
        self.show_add_friend = false;
        self.input_mode = InputMode::Normal;
        self.status = Some(StatusLine::info("Disconnected"));
        Some(NetworkCommand::Disconnect)
    }

    /// Called whenever the wallet reports an identity. A new or changed
    /// identity triggers a balance query and an address book reload.
    pub fn on_session_changed(&mut self, pubkey: Pubkey) -> Option<NetworkCommand> {
        if self.session == Some(pubkey) {
            return None;
        }
        tracing::info!(%pubkey, "Session identity changed");
        self.session = Some(pubkey);
        self.balance = None;
        self.tx_sig = None;
        self.status = Some(StatusLine::info(format!("Connected {}", pubkey)));

        if let Err(e) = self.address_book.reload() {
            tracing::error!(error = %e, "Failed to load address book");
            self.status = Some(StatusLine::error(format!("Address book: {}", e)));
        }
        self.clamp_selected_friend();

        self.request_balance()
    }

    pub fn refresh_balance(&mut self) -> Option<NetworkCommand> {
        if self.pending_balance_id.is_some() {
            return None;
        }
        self.request_balance()
    }

    fn request_balance(&mut self) -> Option<NetworkCommand> {
        let pubkey = self.session?;
        let id = self.next_id();
        self.pending_balance_id = Some(id);
        Some(NetworkCommand::FetchBalance { id, pubkey })
    }

    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
        self.input_mode = InputMode::Normal;
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
        self.input_mode = InputMode::Normal;
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.active_panel.is_editable() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Friends list
    // ========================

    pub fn next_friend(&mut self) {
        let len = self.address_book.len();
        if len > 0 {
            self.selected_friend = (self.selected_friend + 1) % len;
        }
    }

    pub fn prev_friend(&mut self) {
        let len = self.address_book.len();
        if len > 0 {
            self.selected_friend = self.selected_friend.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Use the highlighted friend's address as the recipient
    pub fn select_friend(&mut self) {
        if let Some(friend) = self.address_book.get(self.selected_friend) {
            self.form.recipient = friend.address.clone();
            self.active_panel = Panel::Amount;
            self.status = Some(StatusLine::info(format!("Sending to {}", friend.name)));
        }
    }

    fn clamp_selected_friend(&mut self) {
        let len = self.address_book.len();
        if self.selected_friend >= len {
            self.selected_friend = len.saturating_sub(1);
        }
    }

    // ========================
    // Add-friend popup
    // ========================

    pub fn open_add_friend(&mut self) {
        if self.session.is_some() {
            self.show_add_friend = true;
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn cancel_add_friend(&mut self) {
        self.show_add_friend = false;
        self.friend_draft = FriendDraft::default();
    }

    pub fn friend_char(&mut self, c: char) {
        self.friend_draft.current_mut().push(c);
    }

    pub fn friend_backspace(&mut self) {
        self.friend_draft.current_mut().pop();
    }

    pub fn friend_next_field(&mut self) {
        self.friend_draft.field = self.friend_draft.field.toggle();
    }

    /// Persist the draft; name and address are stored as typed
    pub fn save_friend(&mut self) {
        let draft = std::mem::take(&mut self.friend_draft);
        let contact = Contact::new(draft.name, draft.address);
        match self.address_book.add(contact.clone()) {
            Ok(()) => {
                self.selected_friend = self.address_book.len().saturating_sub(1);
                self.status = Some(StatusLine::info(format!("Added friend {}", contact.name)));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save friend");
                self.status = Some(StatusLine::error(format!("Could not save friend: {}", e)));
            }
        }
        self.show_add_friend = false;
    }

    // ========================
    // Transfer
    // ========================

    /// Build a transfer from the form. Unparseable amounts fail here,
    /// before anything reaches the network, and reset the form.
    pub fn submit_transfer(&mut self) -> Option<NetworkCommand> {
        if self.session.is_none() || self.pending_transfer.is_some() {
            return None;
        }
        self.input_mode = InputMode::Normal;

        let address = self.form.recipient.trim().to_string();
        let amount = match self.form.amount.trim().parse::<f64>() {
            Ok(amount) => amount,
            Err(_) => {
                let reason = format!("Invalid amount: '{}'", self.form.amount.trim());
                tracing::warn!(%reason, "Transfer rejected before submit");
                self.record_transfer(address, f64::NAN, TransferOutcome::Failed(reason));
                self.reset_form();
                return None;
            }
        };

        let id = self.next_id();
        let pending = PendingTransaction { address, amount };
        self.pending_transfer = Some((id, pending.clone()));
        self.status = Some(StatusLine::info("Submitting transfer..."));
        Some(NetworkCommand::SubmitTransfer { id, pending })
    }

    pub fn dismiss_confirmation(&mut self) {
        self.tx_sig = None;
    }

    fn reset_form(&mut self) {
        self.form = TransferForm::default();
        self.cursor_position = 0;
    }

    fn record_transfer(&mut self, recipient: String, amount: f64, outcome: TransferOutcome) {
        if let TransferOutcome::Failed(reason) = &outcome {
            self.status = Some(StatusLine::error(format!("Transfer failed: {}", reason)));
        }
        if self.activity.len() >= MAX_ACTIVITY {
            self.activity.pop_front();
        }
        self.activity.push_back(TransferRecord {
            recipient,
            amount,
            outcome,
            timestamp: chrono::Utc::now(),
        });
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Fold a network response into state. May return a follow-up command.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::Connected { id, pubkey } => {
                if self.pending_connect_id != Some(id) {
                    return None;
                }
                self.pending_connect_id = None;
                self.on_session_changed(pubkey)
            }
            NetworkResponse::ConnectFailed { id, error } => {
                if self.pending_connect_id == Some(id) {
                    self.pending_connect_id = None;
                    self.status = Some(StatusLine::error(format!("Connect failed: {}", error)));
                }
                None
            }
            NetworkResponse::Balance { id, lamports } => {
                if self.pending_balance_id == Some(id) {
                    self.pending_balance_id = None;
                    self.balance = Some(lamports_to_sol(lamports));
                }
                None
            }
            NetworkResponse::BalanceFailed { id, error } => {
                // Displayed balance stays stale
                if self.pending_balance_id == Some(id) {
                    self.pending_balance_id = None;
                    self.status = Some(StatusLine::error(format!("Balance unavailable: {}", error)));
                }
                None
            }
            NetworkResponse::TransferConfirmed { id, signature } => {
                let Some(pending) = self.take_pending_transfer(id) else {
                    return None;
                };
                // Optimistic: network fees are not reflected until the next refresh
                if let Some(balance) = self.balance {
                    self.balance = Some(balance - pending.amount);
                }
                if self.session.is_some() {
                    self.tx_sig = Some(signature);
                }
                self.status = Some(StatusLine::info(format!("Transfer confirmed: {}", signature)));
                self.record_transfer(pending.address, pending.amount, TransferOutcome::Confirmed(signature));
                self.reset_form();
                None
            }
            NetworkResponse::TransferFailed { id, error } => {
                let Some(pending) = self.take_pending_transfer(id) else {
                    return None;
                };
                self.record_transfer(pending.address, pending.amount, TransferOutcome::Failed(error));
                self.reset_form();
                None
            }
        }
    }

    fn take_pending_transfer(&mut self, id: u64) -> Option<PendingTransaction> {
        match &self.pending_transfer {
            Some((pending_id, _)) if *pending_id == id => {
                self.pending_transfer.take().map(|(_, pending)| pending)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_ACTIVITY;
use crate::app::state::ViewState;
    use crate::models::Cluster;
    use crate::storage::{AddressBook, ContactStore, MemoryContactStore};
    use crate::wallet::pubkey::Signature;

    const RECIPIENT: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

    fn state_with(store: &MemoryContactStore) -> AppState {
        AppState::new(
            AddressBook::new(Box::new(store.clone())),
            Cluster::Devnet,
            "http://localhost:8899",
        )
    }

    /// Connect and deliver a balance; returns the state ready for transfers
    fn connected(store: &MemoryContactStore, lamports: u64) -> AppState {
        let mut state = state_with(store);
        let Some(NetworkCommand::Connect { id }) = state.connect() else {
            panic!("expected connect command");
        };
        let cmd = state.handle_response(NetworkResponse::Connected {
            id,
            pubkey: Pubkey::new([1u8; 32]),
        });
        let Some(NetworkCommand::FetchBalance { id, .. }) = cmd else {
            panic!("expected balance fetch");
        };
        state.handle_response(NetworkResponse::Balance { id, lamports });
        state
    }

    fn fill_form(state: &mut AppState, recipient: &str, amount: &str) {
        state.form.recipient = recipient.to_string();
        state.form.amount = amount.to_string();
    }

    fn submit_id(cmd: Option<NetworkCommand>) -> u64 {
        match cmd {
            Some(NetworkCommand::SubmitTransfer { id, .. }) => id,
            other => panic!("expected submit, got {:?}", other),
        }
    }

    #[test]
    fn test_session_bootstrap_loads_balance_and_friends() {
        let store = MemoryContactStore::new();
        store.save(&[Contact::new("alice", RECIPIENT)]).unwrap();

        let state = connected(&store, 2_000_000_000);

        assert_eq!(state.view(), ViewState::ConnectedIdle);
        assert_eq!(state.balance, Some(2.0));
        assert_eq!(state.contacts(), &[Contact::new("alice", RECIPIENT)]);
    }

    #[test]
    fn test_same_identity_does_not_refetch() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 1);
        assert!(state.on_session_changed(Pubkey::new([1u8; 32])).is_none());
        assert!(state.on_session_changed(Pubkey::new([2u8; 32])).is_some());
    }

    #[test]
    fn test_accepted_transfer_sets_signature_and_decrements_balance() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 10_000_000_000);
        fill_form(&mut state, RECIPIENT, "1.5");

        let id = submit_id(state.submit_transfer());
        let sig = Signature::new([5u8; 64]);
        state.handle_response(NetworkResponse::TransferConfirmed { id, signature: sig });

        assert_eq!(state.tx_sig, Some(sig));
        assert_eq!(state.balance, Some(8.5));
        assert_eq!(state.view(), ViewState::ConnectedWithConfirmation);
        assert!(state.form.recipient.is_empty() && state.form.amount.is_empty());

        state.dismiss_confirmation();
        assert_eq!(state.view(), ViewState::ConnectedIdle);
    }

    #[test]
    fn test_rejected_transfer_keeps_balance_and_clears_form() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 3_000_000_000);
        fill_form(&mut state, RECIPIENT, "1");

        let id = submit_id(state.submit_transfer());
        state.handle_response(NetworkResponse::TransferFailed {
            id,
            error: "insufficient funds".to_string(),
        });

        assert_eq!(state.tx_sig, None);
        assert_eq!(state.balance, Some(3.0));
        assert!(state.form.recipient.is_empty() && state.form.amount.is_empty());
        assert!(state.status.as_ref().unwrap().is_error);
        assert!(matches!(state.activity.back().unwrap().outcome, TransferOutcome::Failed(_)));
    }

    #[test]
    fn test_unparseable_amount_never_submits() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 1_000_000_000);
        fill_form(&mut state, RECIPIENT, "lots");

        assert!(state.submit_transfer().is_none());
        assert!(state.form.amount.is_empty());
        assert!(state.pending_transfer.is_none());
        assert!(state.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_second_submit_refused_while_pending() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 1_000_000_000);
        fill_form(&mut state, RECIPIENT, "0.1");
        assert!(state.submit_transfer().is_some());
        fill_form(&mut state, RECIPIENT, "0.2");
        assert!(state.submit_transfer().is_none());
    }

    #[test]
    fn test_stale_responses_are_ignored() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 1_000_000_000);
        state.handle_response(NetworkResponse::Balance { id: 999, lamports: 5 });
        assert_eq!(state.balance, Some(1.0));

        state.handle_response(NetworkResponse::TransferConfirmed {
            id: 999,
            signature: Signature::new([1u8; 64]),
        });
        assert_eq!(state.tx_sig, None);
    }

    #[test]
    fn test_failed_balance_keeps_stale_value() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 4_000_000_000);
        let Some(NetworkCommand::FetchBalance { id, .. }) = state.refresh_balance() else {
            panic!("expected balance fetch");
        };
        state.handle_response(NetworkResponse::BalanceFailed { id, error: "timeout".into() });
        assert_eq!(state.balance, Some(4.0));
        assert!(state.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_add_friend_popup_flow() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 0);

        state.open_add_friend();
        assert_eq!(state.view(), ViewState::ConnectedWithPopup);
        "bob".chars().for_each(|c| state.friend_char(c));
        state.friend_next_field();
        RECIPIENT.chars().for_each(|c| state.friend_char(c));
        state.save_friend();

        assert_eq!(state.view(), ViewState::ConnectedIdle);
        assert_eq!(store.load().unwrap(), vec![Contact::new("bob", RECIPIENT)]);

        state.open_add_friend();
        state.friend_char('x');
        state.cancel_add_friend();
        assert_eq!(state.address_book.len(), 1);
        assert!(state.friend_draft.name.is_empty());
    }

    #[test]
    fn test_select_friend_uses_highlighted_address() {
        let store = MemoryContactStore::new();
        store
            .save(&[Contact::new("a", "AddrA"), Contact::new("b", "AddrB")])
            .unwrap();
        let mut state = connected(&store, 0);

        state.next_friend();
        state.select_friend();

        assert_eq!(state.form.recipient, "AddrB");
        assert_eq!(state.active_panel, Panel::Amount);
    }

    #[test]
    fn test_disconnect_returns_to_disconnected() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 1);
        assert!(matches!(state.disconnect(), Some(NetworkCommand::Disconnect)));
        assert_eq!(state.view(), ViewState::Disconnected);
        assert_eq!(state.balance, None);
    }

    #[test]
    fn test_transfer_resolving_after_disconnect_is_recorded() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 5_000_000_000);
        fill_form(&mut state, RECIPIENT, "1.5");

        let id = submit_id(state.submit_transfer());
        state.disconnect();
        let sig = Signature::new([9u8; 64]);
        state.handle_response(NetworkResponse::TransferConfirmed { id, signature: sig });

        assert_eq!(state.activity.len(), 1);
        assert_eq!(state.activity[0].outcome, TransferOutcome::Confirmed(sig));
        assert!(state.form.recipient.is_empty() && state.form.amount.is_empty());
        assert_eq!(state.tx_sig, None);
        assert_eq!(state.balance, None);
        assert_eq!(state.view(), ViewState::Disconnected);
        assert!(state.pending_transfer.is_none());
    }

    #[test]
    fn test_transfer_failing_after_disconnect_is_recorded() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 5_000_000_000);
        fill_form(&mut state, RECIPIENT, "1");

        let id = submit_id(state.submit_transfer());
        state.disconnect();
        state.handle_response(NetworkResponse::TransferFailed { id, error: "blockhash not found".into() });

        assert_eq!(state.activity.len(), 1);
        assert!(matches!(state.activity[0].outcome, TransferOutcome::Failed(_)));
        assert!(state.form.amount.is_empty());
    }

    #[test]
    fn test_activity_log_is_capped() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 0);
        for i in 0..MAX_ACTIVITY + 5 {
            fill_form(&mut state, RECIPIENT, &format!("bad{}", i));
            state.submit_transfer();
        }
        assert_eq!(state.activity.len(), MAX_ACTIVITY);
        let TransferOutcome::Failed(reason) = &state.activity.back().unwrap().outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains(&format!("bad{}", MAX_ACTIVITY + 4)));
    }

    #[test]
    fn test_editing_handles_multibyte_chars() {
        let store = MemoryContactStore::new();
        let mut state = connected(&store, 0);
        state.active_panel = Panel::Recipient;
        state.start_editing();
        state.enter_char('é');
        state.enter_char('1');
        state.move_cursor_left();
        state.delete_char();
        assert_eq!(state.form.recipient, "1");
    }
}
