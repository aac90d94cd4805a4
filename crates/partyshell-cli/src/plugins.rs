//! Built-in plugin set for the terminal shell.
//!
//! The real screens live in the UI layer; these are the host-side entries
//! that contribute menu items and track chain progress for their screens.

use log::info;
use partyshell_core::plugin::MSG_NEW_BLOCK;
use partyshell_core::{Menu, MenuItem, MessageHandler, Plugin, PluginFactory};
use serde_json::Value;

/// Factory for the plugins compiled into this binary.
pub struct BuiltinPlugins;

impl PluginFactory for BuiltinPlugins {
    fn create(&self, name: &str) -> Option<Box<dyn Plugin>> {
        match name {
            "send" => Some(Box::new(SendPlugin::default())),
            _ => None,
        }
    }
}

/// Host-side entry for the send-funds screen.
#[derive(Default)]
pub struct SendPlugin {
    tip: TipTracker,
}

#[derive(Default)]
struct TipTracker {
    last_seen: Option<u64>,
}

impl MessageHandler for TipTracker {
    fn on_message(&mut self, name: &str, data: &Value) {
        if name != MSG_NEW_BLOCK {
            return;
        }
        if let Some(height) = data.get("block_index").and_then(Value::as_u64) {
            self.last_seen = Some(height);
            info!("send: chain advanced to block {}", height);
        }
    }
}

impl Plugin for SendPlugin {
    fn name(&self) -> &str {
        "send"
    }

    fn menu(&self) -> Option<Menu> {
        Some(Menu {
            group_label: Some("Wallet".to_string()),
            items: vec![MenuItem {
                label: "Send".to_string(),
                value: "send".to_string(),
            }],
        })
    }

    fn on_menu_action(&mut self, value: &str) {
        info!("send: menu action `{}`", value);
    }

    fn message_handler(&mut self) -> Option<&mut dyn MessageHandler> {
        Some(&mut self.tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_knows_send_only() {
        assert!(BuiltinPlugins.create("send").is_some());
        assert!(BuiltinPlugins.create("exchange").is_none());
    }

    #[test]
    fn test_send_plugin_tracks_tip() {
        let mut plugin = SendPlugin::default();
        let handler = plugin.message_handler().unwrap();
        handler.on_message(MSG_NEW_BLOCK, &serde_json::json!({ "block_index": 101 }));
        assert_eq!(plugin.tip.last_seen, Some(101));
    }

    #[test]
    fn test_send_plugin_ignores_other_messages() {
        let mut plugin = SendPlugin::default();
        let handler = plugin.message_handler().unwrap();
        handler.on_message("mempool", &serde_json::json!({ "block_index": 101 }));
        assert_eq!(plugin.tip.last_seen, None);
    }

    #[test]
    fn test_send_plugin_contributes_menu() {
        let plugin = SendPlugin::default();
        let menu = plugin.menu().unwrap();
        assert_eq!(menu.group_label.as_deref(), Some("Wallet"));
        assert_eq!(menu.items[0].value, "send");
    }
}
