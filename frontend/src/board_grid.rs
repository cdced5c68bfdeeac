use yew::{html, Children, Component, Context, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct BoardGridProps {
    pub columns: usize,
    pub children: Children,
}

/// Lays board columns side by side; wide boards scroll horizontally.
pub struct BoardGrid;

impl Component for BoardGrid {
    type Message = ();
    type Properties = BoardGridProps;

    fn create(_ctx: &Context<Self>) -> Self {
        BoardGrid
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let style = format!(
            "display: grid;
             grid-template-columns: repeat({}, minmax(280px, 1fr));
             gap: 16px;
             align-items: start;
             overflow-x: auto;
             padding-bottom: 8px;",
            props.columns.max(1)
        );

        html! {
            <div class="board-grid" style={style}>
                { for props.children.iter() }
            </div>
        }
    }
}
