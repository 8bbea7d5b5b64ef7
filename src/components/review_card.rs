/// One review of the batch: its parsed sections, the rating scale and a comment box.
/// Every change is reported through `on_rate`; the card keeps no rating of its own.
use leptos::*;
use crate::models::rating::{Rating, RatingValue};
use crate::models::review::Review;

#[component]
pub fn ReviewCard(
    review: Review,
    total: usize,
    #[prop(into)] current: Signal<Option<Rating>>,
    #[prop(into)] disabled: Signal<bool>,
    on_rate: Callback<(String, Rating)>,
) -> impl IntoView {
    let sections = review.sections();
    let review_id = store_value(review.id.clone());
    let group = format!("rating-{}", review.position);
    let (comment, set_comment) = create_signal(
        current
            .get_untracked()
            .and_then(|rating| rating.comment)
            .unwrap_or_default(),
    );

    let rate = move |value: RatingValue| {
        let rating = Rating::new(value, Some(comment.get_untracked()));
        on_rate.call((review_id.get_value(), rating));
    };

    // A comment on an unrated review waits until a score is picked.
    let comment_changed = move |ev: web_sys::Event| {
        set_comment.set(event_target_value(&ev));
        if let Some(rating) = current.get_untracked() {
            rate(rating.value);
        }
    };

    let body = if sections.is_empty() {
        view! { <p class="raw-review">{ review.content.clone() }</p> }.into_view()
    } else {
        let lists = [
            ("Strengths", sections.strengths),
            ("Weaknesses", sections.weaknesses),
            ("Questions", sections.questions),
        ];
        view! {
            <div class="review-body">
                {sections.summary.map(|summary| view! {
                    <h4>{ "Summary" }</h4>
                    <p>{ summary }</p>
                })}
                {lists
                    .into_iter()
                    .filter(|(_, points)| !points.is_empty())
                    .map(|(name, points)| view! {
                        <h4>{ name }</h4>
                        <ul>
                            {points.into_iter().map(|point| view! { <li>{ point }</li> }).collect_view()}
                        </ul>
                    })
                    .collect_view()}
            </div>
        }
        .into_view()
    };

    view! {
        <article class="review-card" class:rated=move || current.get().is_some()>
            <header>
                <h3>{ format!("Review {} of {}", review.position, total) }</h3>
                <span class="review-id">{ review.id.clone() }</span>
            </header>
            {body}
            <hr/>
            <fieldset class="rating" prop:disabled=move || disabled.get()>
                <legend>{ "Overall rating" }</legend>
                {RatingValue::ALL
                    .into_iter()
                    .map(move |value| view! {
                        <label class="rating-option">
                            <input
                                type="radio"
                                name=group.clone()
                                value=value.score().to_string()
                                prop:checked=move || current.get().map(|r| r.value) == Some(value)
                                on:change=move |_| rate(value)
                            />
                            { format!("{} · {}", value.score(), value.label()) }
                        </label>
                    })
                    .collect_view()}
            </fieldset>
            <textarea
                placeholder="Optional comment"
                prop:value=move || comment.get()
                prop:disabled=move || disabled.get()
                on:change=comment_changed
            />
        </article>
    }
}
