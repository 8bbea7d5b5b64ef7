use leptos::*;
use crate::models::rating::RatingValue;

#[component]
pub fn Guideline() -> impl IntoView {
    view! {
        <details class="guideline" open=true>
            <summary>{ "Rating guideline" }</summary>
            <p>
                { "Read each review as the authors would. Judge how useful it is to them, \
                   not whether you agree with its verdict." }
            </p>
            <dl>
                {RatingValue::ALL
                    .into_iter()
                    .map(|value| {
                        view! {
                            <dt>{ format!("{} · {}", value.score(), value.label()) }</dt>
                            <dd>{ value.guideline() }</dd>
                        }
                    })
                    .collect_view()}
            </dl>
        </details>
    }
}
