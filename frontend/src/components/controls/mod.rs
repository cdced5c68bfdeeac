//! Controls board: root module wiring the Yew `Component` implementation
//! to its state, update and view submodules.
//!
//! On first render the board fetches controls and technicians.

use yew::prelude::*;

mod board;
mod cards;
mod form;
mod helpers;
mod messages;
mod sheets;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::ControlsBoard;

impl Component for ControlsBoard {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        ControlsBoard::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            ctx.link().send_message(Msg::Load);
        }
    }
}
