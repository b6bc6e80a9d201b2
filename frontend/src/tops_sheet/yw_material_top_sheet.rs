use uuid::Uuid;
use yew::{classes, html, Callback, Component, Context, Html, Properties};

/// Sheet that slides down from the top of the page, used for forms and
/// confirmations. Visibility is driven by the `open` prop.
pub struct YwMaterialTopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub open: bool,
    #[prop_or_default]
    pub title: String,
    pub on_close: Callback<()>,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let on_close = props.on_close.reform(|_| ());

        html! {
            <div
                class={classes!("top-sheet", props.open.then_some("show"))}
                id={self.id.clone()}
                aria-hidden={(!props.open).to_string()}
            >
                <div class="top-sheet-header">
                    <h3>{ props.title.clone() }</h3>
                    <button class="icon-btn" title="Close" onclick={on_close}>
                        <i class="material-icons">{"close"}</i>
                    </button>
                </div>
                <div class="top-sheet-body">
                    { props.children.clone() }
                </div>
            </div>
        }
    }
}
