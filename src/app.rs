//! Tray shell - tray icon, context menu, and global hotkey event loop.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tokio::runtime::Handle;
use tracing::info;
use tray_icon::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, MouseButton, TrayIcon, TrayIconBuilder, TrayIconEvent};
use winit::event::{Event, StartCause};
use winit::event_loop::{ControlFlow, EventLoopBuilder};

use crate::config::Config;
use crate::services::{Level, Notifier, OpCli};

/// How often the event loop wakes to drain tray and hotkey channels.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const TRAY_TOOLTIP: &str = "Clipvault - save clipboard to 1Password";

/// Application shell owning the trigger surface.
pub struct App {
    config: Config,
    store: OpCli,
    notifier: Notifier,
    runtime: Handle,
}

impl App {
    pub fn new(config: Config, store: OpCli, notifier: Notifier, runtime: Handle) -> Self {
        Self {
            config,
            store,
            notifier,
            runtime,
        }
    }

    /// Run the tray shell until the user exits.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoopBuilder::new()
            .build()
            .context("failed to create event loop")?;

        // Hotkey registration failure is not fatal: the tray menu still works.
        let binding = self.config.hotkey.binding.clone();
        let (manager, hotkey_id) = match register_hotkey(&binding) {
            Ok((manager, id)) => {
                info!(%binding, "global hotkey registered");
                (Some(manager), Some(id))
            }
            Err(e) => {
                self.notifier.notify(
                    Level::Warning,
                    &format!("Hotkey {binding} unavailable ({e:#}); use the tray menu instead"),
                );
                (None, None)
            }
        };

        let menu = Menu::new();
        let save_item = MenuItem::new("Save Clipboard Now", true, None);
        let exit_item = MenuItem::new("Exit", true, None);
        menu.append_items(&[&save_item, &PredefinedMenuItem::separator(), &exit_item])
            .context("failed to build tray menu")?;

        let save_id = save_item.id().clone();
        let exit_id = exit_item.id().clone();

        let mut pending_menu = Some(menu);
        let mut tray: Option<TrayIcon> = None;

        event_loop
            .run(move |event, elwt| {
                // Registration must outlive the loop.
                let _ = &manager;

                elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));

                // The tray icon is created once the loop is live so the OS
                // has a message pump to attach it to.
                if let Event::NewEvents(StartCause::Init) = event {
                    if let Some(menu) = pending_menu.take() {
                        match build_tray(menu) {
                            Ok(t) => {
                                tray = Some(t);
                                info!("tray icon ready");
                            }
                            Err(e) => {
                                self.notifier
                                    .notify(Level::Error, &format!("Failed to create tray icon: {e:#}"));
                                elwt.exit();
                                return;
                            }
                        }
                    }
                }

                while let Ok(hotkey_event) = GlobalHotKeyEvent::receiver().try_recv() {
                    if Some(hotkey_event.id) == hotkey_id
                        && hotkey_event.state == HotKeyState::Pressed
                    {
                        info!("hotkey triggered");
                        self.save_clipboard();
                    }
                }

                while let Ok(menu_event) = MenuEvent::receiver().try_recv() {
                    if menu_event.id == save_id {
                        self.save_clipboard();
                    } else if menu_event.id == exit_id {
                        info!("exit requested from tray menu");
                        elwt.exit();
                    }
                }

                while let Ok(tray_event) = TrayIconEvent::receiver().try_recv() {
                    if let TrayIconEvent::DoubleClick {
                        button: MouseButton::Left,
                        ..
                    } = tray_event
                    {
                        self.save_clipboard();
                    }
                }
            })
            .context("event loop failed")?;

        Ok(())
    }

    /// Capture the clipboard and save it, blocking the loop for the duration.
    ///
    /// Blocking here serializes rapid triggers instead of racing them.
    fn save_clipboard(&self) {
        let title = self.config.onepassword.item_title.clone();
        self.runtime
            .block_on(crate::capture_once(&self.store, &title, &self.notifier));
    }
}

fn register_hotkey(binding: &str) -> Result<(GlobalHotKeyManager, u32)> {
    let hotkey: HotKey = binding
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid hotkey binding {binding:?}: {e}"))?;
    let manager = GlobalHotKeyManager::new().context("failed to initialize hotkey manager")?;
    manager
        .register(hotkey)
        .with_context(|| format!("failed to register {binding}"))?;
    Ok((manager, hotkey.id()))
}

fn build_tray(menu: Menu) -> Result<TrayIcon> {
    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(TRAY_TOOLTIP)
        .with_icon(solid_icon()?)
        .build()
        .context("failed to create tray icon")?;
    Ok(tray)
}

/// A 16x16 solid square; enough for a tray glyph without bundling assets.
fn solid_icon() -> Result<Icon> {
    const SIZE: u32 = 16;
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for _ in 0..SIZE * SIZE {
        rgba.extend_from_slice(&[0x2f, 0x6f, 0xeb, 0xff]);
    }
    Icon::from_rgba(rgba, SIZE, SIZE).context("failed to build tray icon image")
}
