//! Returns the view and session to their initial state.

use crate::{
    session::{Generation, SessionState},
    view::{Panel, TextSlot, ViewSurface},
};

pub struct ResetController;

impl ResetController {
    /// In-flight requests keep running but their token is now stale, so
    /// their responses are dropped on arrival. The selected unit is kept.
    pub fn reset(view: &dyn ViewSurface, session: &mut SessionState) -> Generation {
        let generation = session.advance_generation();
        session.forget_result();
        session.plot_slot_mut().clear();

        view.clear_form();
        for slot in [
            TextSlot::Distance,
            TextSlot::Dimensions,
            TextSlot::EndOfFile,
            TextSlot::Error,
        ] {
            view.set_text(slot, "");
        }
        for panel in [Panel::Result, Panel::Plot, Panel::Error] {
            view.set_visible(panel, false);
        }
        view.set_image_source(None);

        generation
    }
}
