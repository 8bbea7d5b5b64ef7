/// The rating form for a whole batch: ten review cards, a progress line and the
/// submit button. Ratings are mirrored locally for display; the server session is
/// the source of truth and decides whether a submission is complete.
use leptos::*;
use wasm_bindgen_futures::spawn_local;
use gloo_timers::callback::Timeout;
use std::collections::BTreeMap;
use crate::client;
use crate::components::review_card::ReviewCard;
use crate::models::rating::Rating;
use crate::models::wire::{RatingRequest, SessionView};

const TOAST_MS: u32 = 4_000;

#[derive(Clone, Debug, PartialEq)]
enum Status {
    Success(String),
    Error(String),
}

/// Submit waits for an idle form: nothing being submitted, no rating update in flight.
fn submit_blocked(submitting: bool, pending: usize) -> bool {
    submitting || pending > 0
}

#[component]
pub fn RatingBatch(session: SessionView, on_reload: Callback<SessionView>) -> impl IntoView {
    let session_id = session.session_id;
    let total = session.batch.len();
    let ratings = create_rw_signal(session.ratings.clone());
    let (status, set_status) = create_signal(None::<Status>);
    let (spent, set_spent) = create_signal(false);
    let (submitting, set_submitting) = create_signal(false);
    // rating updates still on their way to the server
    let (pending, set_pending) = create_signal(0usize);

    let on_rate = Callback::new(move |(review_id, rating): (String, Rating)| {
        let previous = ratings.with_untracked(|r| r.get(&review_id).cloned());
        ratings.update(|r| {
            r.insert(review_id.clone(), rating.clone());
        });
        let request = RatingRequest {
            review_id: review_id.clone(),
            value: i64::from(rating.value.score()),
            comment: rating.comment,
        };
        set_pending.update(|n| *n += 1);
        spawn_local(async move {
            let result = client::put_rating(session_id, &request).await;
            set_pending.update(|n| *n = n.saturating_sub(1));
            if let Err(err) = result {
                // roll the card back to what the server still holds
                ratings.update(|r| match previous {
                    Some(previous) => {
                        r.insert(review_id, previous);
                    }
                    None => {
                        r.remove(&review_id);
                    }
                });
                set_status.set(Some(Status::Error(err.to_string())));
            }
        });
    });

    let submit = move |_| {
        // a comment edit flushed by the click's blur must land before the submit
        if submit_blocked(submitting.get_untracked(), pending.get_untracked()) {
            return;
        }
        set_submitting.set(true);
        set_status.set(None);
        spawn_local(async move {
            match client::submit(session_id).await {
                Ok(receipt) => {
                    ratings.set(BTreeMap::new());
                    set_spent.set(true);
                    set_status.set(Some(Status::Success(format!(
                        "✅ {} ratings submitted. Thank you!",
                        receipt.rows_written
                    ))));
                    Timeout::new(TOAST_MS, move || set_status.set(None)).forget();
                }
                Err(err) => set_status.set(Some(Status::Error(err.to_string()))),
            }
            set_submitting.set(false);
        });
    };

    let reload = move |_| {
        spawn_local(async move {
            match client::reload_session(session_id).await {
                Ok(view) => on_reload.call(view),
                Err(err) => set_status.set(Some(Status::Error(err.to_string()))),
            }
        });
    };

    let cards = session
        .batch
        .into_iter()
        .map(|review| {
            let id = review.id.clone();
            let current = Signal::derive(move || ratings.with(|r| r.get(&id).cloned()));
            view! {
                <ReviewCard
                    review=review
                    total=total
                    current=current
                    disabled=spent
                    on_rate=on_rate
                />
            }
        })
        .collect_view();

    view! {
        <section class="rating-batch">
            <h2>{ format!("Evaluating as {}", session.user_id) }</h2>
            {match session.prior_submissions {
                0 => None,
                done if done >= total => Some(view! {
                    <p class="info complete">
                        { "You have completed all your assigned reviews. You can still rate them again below." }
                    </p>
                }),
                done => Some(view! {
                    <p class="info">{ format!("You have already submitted {} ratings.", done) }</p>
                }),
            }}
            {cards}
            <footer class="batch-footer">
                <span class="progress">
                    {move || format!("{} of {} reviews rated", ratings.with(|r| r.len()), total)}
                </span>
                <Show
                    when=move || spent.get()
                    fallback=move || view! {
                        <button
                            on:click=submit
                            prop:disabled=move || submit_blocked(submitting.get(), pending.get())
                        >
                            { "Submit ratings" }
                        </button>
                    }
                >
                    <button on:click=reload>{ "Rate this batch again" }</button>
                </Show>
            </footer>
            {move || status.get().map(|status| match status {
                Status::Success(message) => view! { <p class="toast success">{ message }</p> },
                Status::Error(message) => view! { <p class="toast error">{ message }</p> },
            })}
        </section>
    }
}
