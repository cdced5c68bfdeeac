//! Sliding sheet used for the add forms and the technician panel.
//!
//! The parent owns the open flag; the sheet only renders it and reports the
//! close button and backdrop clicks through `on_close`.

use uuid::Uuid;
use yew::{classes, html, Callback, Component, Context, Html, Properties};

pub struct TopSheet {
    title_id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub open: bool,
    pub title: String,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

impl Component for TopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            title_id: format!("sheet-title-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        if !props.open {
            return html! {};
        }
        let close = props.on_close.reform(|_| ());
        let close_backdrop = props.on_close.reform(|_| ());

        html! {
            <>
                <div class="sheet-backdrop" onclick={close_backdrop} />
                <section
                    class={classes!("top-sheet", "show")}
                    role="dialog"
                    aria-modal="true"
                    aria-labelledby={self.title_id.clone()}
                >
                    <header class="sheet-header">
                        <h2 id={self.title_id.clone()}>{ &props.title }</h2>
                        <button class="icon-btn" title="Close" onclick={close}>{"×"}</button>
                    </header>
                    { props.children.clone() }
                </section>
            </>
        }
    }
}
