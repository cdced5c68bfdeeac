use crate::app::App;

mod api;
mod app;
mod board_grid;
mod components;
mod top_sheet;

fn main() {
    yew::Renderer::<App>::new().render();
}
