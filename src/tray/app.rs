//! Tray application
//!
//! Runs the winit event loop on the main thread. The tray icon and its menu are
//! created once the loop starts; balance updates arrive from the poller as user
//! events and are copied into the menu items.

use muda::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::WindowId;

use super::icon::{tray_icon_for, BalanceLevel};
use crate::core::MenuText;
use crate::monitor::DisplayUpdate;

/// Events delivered to the tray event loop
#[derive(Debug)]
pub enum UserEvent {
    /// New text from the balance poller
    Display(DisplayUpdate),
    /// A menu item was clicked
    Menu(MenuEvent),
}

/// Menu items kept around so their text can be updated in place
struct MenuItems {
    provider: MenuItem,
    credits: MenuItem,
    usage: MenuItem,
    last_updated: MenuItem,
    quit: MenuItem,
}

impl MenuItems {
    fn new(text: &MenuText) -> Self {
        // Informational rows are disabled so they render as plain labels
        Self {
            provider: MenuItem::new(&text.provider, false, None),
            credits: MenuItem::new(&text.credits, false, None),
            usage: MenuItem::new(&text.usage, false, None),
            last_updated: MenuItem::new(&text.last_updated, false, None),
            quit: MenuItem::new("Quit", true, None),
        }
    }

    fn build_menu(&self) -> anyhow::Result<Menu> {
        let menu = Menu::new();
        menu.append_items(&[
            &self.provider,
            &self.credits,
            &self.usage,
            &PredefinedMenuItem::separator(),
            &self.last_updated,
            &PredefinedMenuItem::separator(),
            &self.quit,
        ])?;
        Ok(menu)
    }

    fn set_text(&self, text: &MenuText) {
        self.provider.set_text(&text.provider);
        self.credits.set_text(&text.credits);
        self.usage.set_text(&text.usage);
        self.last_updated.set_text(&text.last_updated);
    }
}

struct TrayApp {
    initial: MenuText,
    items: Option<MenuItems>,
    tray: Option<TrayIcon>,
    level: BalanceLevel,
}

impl TrayApp {
    fn new(initial: MenuText) -> Self {
        Self {
            initial,
            items: None,
            tray: None,
            level: BalanceLevel::Unknown,
        }
    }

    fn create_tray(&mut self) -> anyhow::Result<()> {
        let items = MenuItems::new(&self.initial);
        let menu = items.build_menu()?;

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_title(&self.initial.title)
            .with_tooltip(&self.initial.title)
            .with_icon(tray_icon_for(self.level)?)
            .build()?;

        self.items = Some(items);
        self.tray = Some(tray);
        Ok(())
    }

    fn apply(&mut self, update: DisplayUpdate) {
        let text = &update.text;
        tracing::debug!(title = %text.title, "Updating tray");

        if let Some(items) = &self.items {
            items.set_text(text);
        }

        let Some(tray) = &self.tray else {
            self.initial = update.text;
            return;
        };

        tray.set_title(Some(&text.title));
        if let Err(e) = tray.set_tooltip(Some(&text.title)) {
            tracing::warn!("Failed to set tray tooltip: {}", e);
        }

        let level = BalanceLevel::from_state(&update.state);
        if level != self.level {
            let result = tray_icon_for(level)
                .and_then(|icon| tray.set_icon(Some(icon)).map_err(Into::into));
            match result {
                Ok(()) => self.level = level,
                Err(e) => tracing::warn!("Failed to update tray icon: {}", e),
            }
        }
    }
}

impl ApplicationHandler<UserEvent> for TrayApp {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        // The tray must be created after the event loop is running (macOS requirement)
        if cause == StartCause::Init {
            if let Err(e) = self.create_tray() {
                tracing::error!("Failed to create tray icon: {}", e);
                event_loop.exit();
            }
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {}

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Display(update) => self.apply(update),
            UserEvent::Menu(menu_event) => {
                let is_quit = self
                    .items
                    .as_ref()
                    .is_some_and(|items| menu_event.id == *items.quit.id());
                if is_quit {
                    tracing::info!("Quit selected");
                    self.tray = None;
                    event_loop.exit();
                }
            }
        }
    }
}

/// Build the event loop. Must be called on the main thread.
pub fn event_loop() -> anyhow::Result<EventLoop<UserEvent>> {
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;

    let proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Menu(event));
    }));

    Ok(event_loop)
}

/// Forward a poller update into the event loop; `false` once the loop is gone
pub fn publish(proxy: &EventLoopProxy<UserEvent>, update: DisplayUpdate) -> bool {
    proxy.send_event(UserEvent::Display(update)).is_ok()
}

/// Run the tray until the user quits
pub fn run(event_loop: EventLoop<UserEvent>, initial: MenuText) -> anyhow::Result<()> {
    tracing::info!("Starting tray application");

    let mut app = TrayApp::new(initial);
    event_loop.run_app(&mut app)?;

    Ok(())
}
