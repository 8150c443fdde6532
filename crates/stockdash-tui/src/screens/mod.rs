//! Screen implementations. Each screen is a top-level Component.

pub mod activity;
pub mod overview;
pub mod positions;

use crate::component::Component;
use crate::screen::ScreenId;

pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Overview, Box::new(overview::OverviewScreen::new())),
        (ScreenId::Positions, Box::new(positions::PositionsScreen::new())),
        (ScreenId::Activity, Box::new(activity::ActivityScreen::new())),
    ]
}
