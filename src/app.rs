/// Root of the evaluation UI: annotator selection in the sidebar, guideline and
/// the rating form for the active session in the main column.
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use crate::components::{guideline::Guideline, rating_batch::RatingBatch, user_select::UserSelect};
use crate::models::wire::SessionView;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/review-eval.css"/>
        <Title text="Review Point Rating"/>
        <Router>
            <Routes>
                <Route path="" view=EvaluationPage/>
            </Routes>
        </Router>
    }
}

#[component]
fn EvaluationPage() -> impl IntoView {
    // Signal holding the session opened from the sidebar, if any.
    let (session, set_session) = create_signal(None::<SessionView>);
    let open_session = Callback::new(move |view: SessionView| set_session.set(Some(view)));

    view! {
        <div class="layout">
            <aside class="sidebar">
                <UserSelect on_session=open_session/>
            </aside>
            <main class="content">
                <h1>{ "📝 Review Evaluation Task" }</h1>
                <Guideline/>
                {move || match session.get() {
                    Some(view) => view! {
                        <RatingBatch session=view on_reload=open_session/>
                    }
                    .into_view(),
                    None => view! {
                        <p class="info">{ "Please select a user from the sidebar to begin." }</p>
                    }
                    .into_view(),
                }}
            </main>
        </div>
    }
}
