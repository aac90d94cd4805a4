//! Plugin hosting.
//!
//! UI plugins are self-contained modules hosted inside the shell. The shell
//! knows nothing about their internals; it loads them by name at startup (or
//! on reconfiguration), composes their menu contributions, and fans data
//! notifications out to the ones that opted in.

use crate::error::ShellError;
use log::{debug, warn};
use serde_json::Value;

/// Message name sent when the server height changes.
pub const MSG_NEW_BLOCK: &str = "new_block";

/// A menu action item contributed by a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub value: String,
}

/// A plugin's menu contribution: an optional group heading plus its items.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    pub group_label: Option<String>,
    pub items: Vec<MenuItem>,
}

/// Receiver for data notifications.
pub trait MessageHandler {
    fn on_message(&mut self, name: &str, data: &Value);
}

/// A hosted UI plugin.
///
/// Notification is capability-optional: a plugin that returns `None` from
/// [`message_handler`](Plugin::message_handler) is a valid, quiet plugin,
/// not an error.
pub trait Plugin {
    fn name(&self) -> &str;

    /// Called once after the plugin is loaded.
    fn init(&mut self) -> Result<(), ShellError> {
        Ok(())
    }

    /// Menu entries this plugin contributes, if any.
    fn menu(&self) -> Option<Menu> {
        None
    }

    /// Invoked when the user activates one of this plugin's menu items.
    fn on_menu_action(&mut self, _value: &str) {}

    /// Notification entry point, if the plugin exposes one.
    fn message_handler(&mut self) -> Option<&mut dyn MessageHandler> {
        None
    }
}

/// Creates plugins from configured names.
pub trait PluginFactory {
    fn create(&self, name: &str) -> Option<Box<dyn Plugin>>;
}

/// Ordered registry of loaded plugins, owned for the session lifetime.
///
/// Plugins are never unloaded individually; reconfiguration replaces the
/// whole set via [`reload`](PluginRegistry::reload).
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    loaded: bool,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin directly, preserving registration order.
    pub fn register(&mut self, mut plugin: Box<dyn Plugin>) -> Result<(), ShellError> {
        plugin.init()?;
        self.plugins.push(plugin);
        self.loaded = true;
        Ok(())
    }

    /// Load plugins by name through the factory. Unknown names are skipped
    /// with a warning. Marks the registry loaded even if nothing matched,
    /// so later poll failures are treated as transient.
    pub fn load(&mut self, names: &[String], factory: &dyn PluginFactory) -> Result<(), ShellError> {
        for name in names {
            match factory.create(name) {
                Some(plugin) => self.register(plugin)?,
                None => warn!("unknown plugin `{}`, skipping", name),
            }
        }
        self.loaded = true;
        Ok(())
    }

    /// Full reload: drop every plugin and load the new set.
    pub fn reload(
        &mut self,
        names: &[String],
        factory: &dyn PluginFactory,
    ) -> Result<(), ShellError> {
        self.plugins.clear();
        self.loaded = false;
        self.load(names, factory)
    }

    /// Whether a load has happened this session (even an empty one).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Fan a notification out to every plugin with a handler, in
    /// registration order. Handler-less plugins are silently skipped.
    pub fn notify(&mut self, name: &str, data: &Value) {
        debug!("notify plugins `{}`: {}", name, data);
        for plugin in &mut self.plugins {
            if let Some(handler) = plugin.message_handler() {
                handler.on_message(name, data);
            }
        }
    }

    /// Menu contributions in registration order.
    pub fn menus(&self) -> Vec<(usize, Menu)> {
        self.plugins
            .iter()
            .enumerate()
            .filter_map(|(index, plugin)| plugin.menu().map(|menu| (index, menu)))
            .collect()
    }

    /// Route a menu action to the owning plugin.
    pub fn activate(&mut self, plugin_index: usize, value: &str) {
        if let Some(plugin) = self.plugins.get_mut(plugin_index) {
            plugin.on_menu_action(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Quiet;

    impl Plugin for Quiet {
        fn name(&self) -> &str {
            "quiet"
        }
    }

    struct Recorder {
        events: Rc<RefCell<Vec<(String, Value)>>>,
    }

    impl MessageHandler for Recorder {
        fn on_message(&mut self, name: &str, data: &Value) {
            self.events.borrow_mut().push((name.to_string(), data.clone()));
        }
    }

    struct Listening {
        recorder: Recorder,
        menu_actions: Vec<String>,
    }

    impl Plugin for Listening {
        fn name(&self) -> &str {
            "listening"
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
            self.menu_actions.push(value.to_string());
        }

        fn message_handler(&mut self) -> Option<&mut dyn MessageHandler> {
            Some(&mut self.recorder)
        }
    }

    fn listening(events: &Rc<RefCell<Vec<(String, Value)>>>) -> Box<dyn Plugin> {
        Box::new(Listening {
            recorder: Recorder {
                events: Rc::clone(events),
            },
            menu_actions: Vec::new(),
        })
    }

    #[test]
    fn test_notify_skips_handlerless_plugins() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(Quiet)).unwrap();
        registry.register(listening(&events)).unwrap();

        registry.notify(MSG_NEW_BLOCK, &serde_json::json!({ "block_index": 101 }));

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, MSG_NEW_BLOCK);
        assert_eq!(events[0].1["block_index"], 101);
    }

    #[test]
    fn test_notify_preserves_registration_order() {
        struct Tagged {
            tag: &'static str,
            order: Rc<RefCell<Vec<&'static str>>>,
        }
        impl MessageHandler for Tagged {
            fn on_message(&mut self, _name: &str, _data: &Value) {
                self.order.borrow_mut().push(self.tag);
            }
        }
        struct TaggedPlugin {
            handler: Tagged,
        }
        impl Plugin for TaggedPlugin {
            fn name(&self) -> &str {
                self.handler.tag
            }
            fn message_handler(&mut self) -> Option<&mut dyn MessageHandler> {
                Some(&mut self.handler)
            }
        }

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry
            .register(Box::new(TaggedPlugin {
                handler: Tagged {
                    tag: "a",
                    order: Rc::clone(&order),
                },
            }))
            .unwrap();
        registry
            .register(Box::new(TaggedPlugin {
                handler: Tagged {
                    tag: "b",
                    order: Rc::clone(&order),
                },
            }))
            .unwrap();

        registry.notify(MSG_NEW_BLOCK, &serde_json::json!({ "block_index": 7 }));
        assert_eq!(*order.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_skips_unknown_names() {
        struct OnlySend;
        impl PluginFactory for OnlySend {
            fn create(&self, name: &str) -> Option<Box<dyn Plugin>> {
                (name == "send").then(|| Box::new(Quiet) as Box<dyn Plugin>)
            }
        }

        let mut registry = PluginRegistry::new();
        registry
            .load(
                &["send".to_string(), "nonexistent".to_string()],
                &OnlySend,
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.is_loaded());
    }

    #[test]
    fn test_empty_load_still_counts_as_loaded() {
        struct Nothing;
        impl PluginFactory for Nothing {
            fn create(&self, _name: &str) -> Option<Box<dyn Plugin>> {
                None
            }
        }

        let mut registry = PluginRegistry::new();
        assert!(!registry.is_loaded());
        registry.load(&["ghost".to_string()], &Nothing).unwrap();
        assert!(registry.is_loaded());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reload_replaces_plugins() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.register(listening(&events)).unwrap();
        registry.register(listening(&events)).unwrap();
        assert_eq!(registry.len(), 2);

        struct One;
        impl PluginFactory for One {
            fn create(&self, _name: &str) -> Option<Box<dyn Plugin>> {
                Some(Box::new(Quiet))
            }
        }
        registry.reload(&["quiet".to_string()], &One).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_menus_and_activation() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(Quiet)).unwrap();
        registry.register(listening(&events)).unwrap();

        let menus = registry.menus();
        assert_eq!(menus.len(), 1);
        let (index, menu) = &menus[0];
        assert_eq!(*index, 1);
        assert_eq!(menu.group_label.as_deref(), Some("Wallet"));
        assert_eq!(menu.items[0].value, "send");

        registry.activate(*index, "send");
    }
}
