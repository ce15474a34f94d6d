use yew::{html, Children, Component, Context, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct WorkspaceGridProps {
    /// Value for `grid-template-columns`, one track per child.
    pub columns: String,
    pub children: Children,
}

/// Side-by-side layout of the editor panes.
pub struct WorkspaceGrid;

impl Component for WorkspaceGrid {
    type Message = ();
    type Properties = WorkspaceGridProps;

    fn create(_ctx: &Context<Self>) -> Self {
        WorkspaceGrid
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let style = format!(
            "display: grid;
             grid-template-columns: {};
             gap: 12px;
             min-height: calc(100vh - 64px);
             padding: 12px;
             box-sizing: border-box;",
            props.columns
        );

        html! {
            <div class="workspace-grid" style={style}>
                { for props.children.iter() }
            </div>
        }
    }
}
