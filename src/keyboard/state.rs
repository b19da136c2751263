use crate::event_model::TouchSample;
use crate::layout::{LayoutPage, ZoneId};

/// Highlight state between two batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PressState {
    #[default]
    Idle,
    Pressed(ZoneId),
}

/// Everything the frame loop carries from one iteration to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    pub press: PressState,
    pub page: LayoutPage,
}

impl PanelState {
    pub fn pressed_zone(&self) -> Option<ZoneId> {
        match self.press {
            PressState::Idle => None,
            PressState::Pressed(zone) => Some(zone),
        }
    }

    /// Advances the press state with the latest sample and the zone under it.
    ///
    /// While the contact is down the highlight follows the finger. When it
    /// lifts, the zone highlighted last is returned as the activation. A batch
    /// that ends one contact and starts another does both, in that order.
    pub fn track(&mut self, sample: &TouchSample, zone: Option<ZoneId>) -> Option<ZoneId> {
        let activated = if sample.released || !sample.down {
            self.pressed_zone()
        } else {
            None
        };
        self.press = match zone {
            Some(zone) if sample.down => PressState::Pressed(zone),
            _ => PressState::Idle,
        };
        activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(index: u8) -> Option<ZoneId> {
        ZoneId::new(index)
    }

    fn down() -> TouchSample {
        TouchSample {
            down: true,
            ..TouchSample::default()
        }
    }

    fn up() -> TouchSample {
        TouchSample::default()
    }

    #[test]
    fn test_tap_activates() {
        let mut state = PanelState::default();
        assert_eq!(state.track(&down(), zone(3)), None);
        assert_eq!(state.pressed_zone(), zone(3));
        assert_eq!(state.track(&up(), None), zone(3));
        assert_eq!(state.press, PressState::Idle);
    }

    /// Dragging from A to B and lifting activates B only.
    #[test]
    fn test_drag_activates_last_zone() {
        let mut state = PanelState::default();
        state.track(&down(), zone(3));
        state.track(&down(), zone(4));
        assert_eq!(state.track(&up(), zone(3)), zone(4));
    }

    #[test]
    fn test_lift_over_margin_activates_nothing() {
        let mut state = PanelState::default();
        state.track(&down(), zone(10));
        state.track(&down(), None);
        assert_eq!(state.pressed_zone(), None);
        assert_eq!(state.track(&up(), None), None);
    }

    /// The lifted zone fires and the new contact takes over the highlight.
    #[test]
    fn test_release_and_new_press_in_one_batch() {
        let mut state = PanelState::default();
        state.track(&down(), zone(0));
        let handover = TouchSample {
            down: true,
            released: true,
            ..TouchSample::default()
        };
        assert_eq!(state.track(&handover, zone(5)), zone(0));
        assert_eq!(state.pressed_zone(), zone(5));
        assert_eq!(state.track(&up(), None), zone(5));
    }

    #[test]
    fn test_up_without_down_activates_nothing() {
        let mut state = PanelState::default();
        assert_eq!(state.track(&up(), zone(5)), None);
        assert_eq!(state.track(&up(), zone(5)), None);
    }

    #[test]
    fn test_tracking_keeps_page() {
        let mut state = PanelState {
            press: PressState::Idle,
            page: LayoutPage::from_bits(3).unwrap(),
        };
        state.track(&down(), zone(1));
        state.track(&up(), None);
        assert_eq!(state.page.bits(), 3);
    }
}
