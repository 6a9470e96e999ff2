//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    if let Some(cmd) = self.state.handle_response(response) {
                        self.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: NetworkCommand) {
        if self.network_tx.send(cmd).is_err() {
            tracing::error!("Network actor is gone; command dropped");
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            // Session
            UiEvent::Connect => self.state.connect(),
            UiEvent::Disconnect => self.state.disconnect(),
            UiEvent::RefreshBalance => self.state.refresh_balance(),

            // Panel navigation
            UiEvent::NextPanel => {
                self.state.next_panel();
                None
            }
            UiEvent::PrevPanel => {
                self.state.prev_panel();
                None
            }

            // Input editing
            UiEvent::StartEditing => {
                self.state.start_editing();
                None
            }
            UiEvent::StopEditing => {
                self.state.stop_editing();
                None
            }
            UiEvent::CharInput(c) => {
                self.state.enter_char(c);
                None
            }
            UiEvent::Backspace => {
                self.state.delete_char();
                None
            }
            UiEvent::CursorLeft => {
                self.state.move_cursor_left();
                None
            }
            UiEvent::CursorRight => {
                self.state.move_cursor_right();
                None
            }

            // Friends list
            UiEvent::NextFriend => {
                self.state.next_friend();
                None
            }
            UiEvent::PrevFriend => {
                self.state.prev_friend();
                None
            }
            UiEvent::SelectFriend => {
                self.state.select_friend();
                None
            }

            // Add-friend popup
            UiEvent::OpenAddFriend => {
                self.state.open_add_friend();
                None
            }
            UiEvent::FriendChar(c) => {
                self.state.friend_char(c);
                None
            }
            UiEvent::FriendBackspace => {
                self.state.friend_backspace();
                None
            }
            UiEvent::FriendNextField => {
                self.state.friend_next_field();
                None
            }
            UiEvent::SaveFriend => {
                self.state.save_friend();
                None
            }
            UiEvent::CancelAddFriend => {
                self.state.cancel_add_friend();
                None
            }

            // Transfer
            UiEvent::SubmitTransfer => self.state.submit_transfer(),
            UiEvent::DismissConfirmation => {
                self.state.dismiss_confirmation();
                None
            }

            // Popups
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                None
            }

            // System
            UiEvent::Quit => return true,
        };

        if let Some(cmd) = cmd {
            self.send(cmd);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cluster;
    use crate::storage::{AddressBook, MemoryContactStore};
    use crate::wallet::pubkey::Pubkey;

    #[tokio::test]
    async fn test_connect_round_trip_emits_balance_fetch() {
        let state = AppState::new(
            AddressBook::new(Box::new(MemoryContactStore::new())),
            Cluster::Devnet,
            "http://localhost:8899",
        );
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(AppActor::new(state, net_cmd_tx, render_tx).run(ui_rx, net_resp_rx));

        ui_tx.send(UiEvent::Connect).unwrap();
        let Some(NetworkCommand::Connect { id }) = net_cmd_rx.recv().await else {
            panic!("expected connect");
        };

        let pubkey = Pubkey::new([3u8; 32]);
        net_resp_tx.send(NetworkResponse::Connected { id, pubkey }).unwrap();
        match net_cmd_rx.recv().await {
            Some(NetworkCommand::FetchBalance { pubkey: requested, .. }) => assert_eq!(requested, pubkey),
            other => panic!("expected balance fetch, got {:?}", other),
        }

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();

        let mut last = None;
        while let Ok(state) = render_rx.try_recv() {
            last = Some(state);
        }
        assert_eq!(last.unwrap().wallet_address, Some(pubkey.to_string()));
    }
}
