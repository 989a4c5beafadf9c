//! Sessions behind the "More info" button

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::application::views::DetailPanel;

struct PanelSession {
    panel: DetailPanel,
    chat_id: String,
    message_id: Option<String>,
    last_active: Instant,
}

/// A sent image message whose button should be taken down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredPanel {
    pub chat_id: String,
    pub message_id: String,
}

/// Detail panels keyed by button token, expiring after a period of inactivity
pub struct DetailPanels {
    sessions: Mutex<HashMap<String, PanelSession>>,
    idle_timeout: Duration,
}

impl DetailPanels {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, PanelSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store a panel and return the token for its button
    pub fn open(&self, panel: DetailPanel, chat_id: impl Into<String>) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions().insert(
            token.clone(),
            PanelSession {
                panel,
                chat_id: chat_id.into(),
                message_id: None,
                last_active: Instant::now(),
            },
        );
        token
    }

    /// Remember which message carries the button
    pub fn attach_message(&self, token: &str, message_id: impl Into<String>) {
        if let Some(session) = self.sessions().get_mut(token) {
            session.message_id = Some(message_id.into());
        }
    }

    /// Look up a live panel; each use restarts its idle timer
    pub fn show(&self, token: &str) -> Option<DetailPanel> {
        let mut sessions = self.sessions();
        let now = Instant::now();

        let session = sessions.get_mut(token)?;
        if now.duration_since(session.last_active) >= self.idle_timeout {
            sessions.remove(token);
            return None;
        }
        session.last_active = now;
        Some(session.panel.clone())
    }

    /// Drop idle sessions, returning the messages whose buttons should go
    pub fn sweep_expired(&self) -> Vec<ExpiredPanel> {
        let now = Instant::now();
        let mut expired = Vec::new();

        self.sessions().retain(|_, session| {
            if now.duration_since(session.last_active) < self.idle_timeout {
                return true;
            }
            if let Some(message_id) = session.message_id.take() {
                expired.push(ExpiredPanel {
                    chat_id: std::mem::take(&mut session.chat_id),
                    message_id,
                });
            }
            false
        });

        if !expired.is_empty() {
            tracing::debug!("Expired {} detail panels", expired.len());
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::views::photo::DetailField;

    fn panel() -> DetailPanel {
        DetailPanel {
            fields: vec![DetailField { name: "Rover".to_string(), value: "Spirit".to_string() }],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_expires_after_inactivity() {
        let panels = DetailPanels::new(Duration::from_secs(60));
        let token = panels.open(panel(), "42");

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(panels.show(&token), Some(panel()));

        // use at 59s restarts the timer
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(panels.show(&token).is_some());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(panels.show(&token).is_none());
        // an expired press removes the session, so nothing is left to sweep
        assert!(panels.sweep_expired().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_reports_attached_messages() {
        let panels = DetailPanels::new(Duration::from_secs(60));
        let sent = panels.open(panel(), "chat-1");
        panels.attach_message(&sent, "100");
        let unsent = panels.open(panel(), "chat-2");

        tokio::time::sleep(Duration::from_secs(30)).await;
        let fresh = panels.open(panel(), "chat-3");
        assert!(panels.sweep_expired().is_empty());

        tokio::time::sleep(Duration::from_secs(31)).await;
        let expired = panels.sweep_expired();
        assert_eq!(expired, vec![ExpiredPanel { chat_id: "chat-1".to_string(), message_id: "100".to_string() }]);
        assert!(panels.show(&unsent).is_none());
        assert!(panels.show(&fresh).is_some());
    }

    #[test]
    fn test_unknown_token() {
        let panels = DetailPanels::new(Duration::from_secs(60));
        assert!(panels.show("missing").is_none());
    }
}
