//! Tab screens. Each tab is one top-level Component, rebuilt on every
//! activation so nothing carries over from a previous visit.

pub mod camera;
pub mod wifi;

use campanel_core::Tab;

use crate::component::Component;

pub fn create_screen(tab: Tab) -> Box<dyn Component> {
    match tab {
        Tab::Camera => Box::new(camera::CameraScreen::new()),
        Tab::Wifi => Box::new(wifi::WifiScreen::new()),
    }
}

/// Move a selection by `delta`, clamped to `0..len`.
pub(crate) fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
