//! 向导第一步：主题与正文

use super::form_state::ComposerState;
use leptos::prelude::*;

#[component]
pub fn ComposeStep(state: ComposerState) -> impl IntoView {
    let draft = state.draft;

    let can_advance = move || draft.with(|d| d.can_advance());

    let on_next = move |_| {
        draft.update(|d| {
            d.advance();
        });
    };

    view! {
        <div class="space-y-4">
            <div class="form-control">
                <label class="label" for="subject">
                    <span class="label-text">"Subject"</span>
                </label>
                <input
                    id="subject"
                    type="text"
                    placeholder="Quarterly all-hands update"
                    class="input input-bordered w-full"
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.subject = value);
                    }
                    prop:value=move || draft.with(|d| d.subject.clone())
                />
            </div>

            <div class="form-control">
                <label class="label" for="body">
                    <span class="label-text">"Message"</span>
                </label>
                <textarea
                    id="body"
                    rows="8"
                    placeholder="Write your message..."
                    class="textarea textarea-bordered w-full"
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.body = value);
                    }
                    prop:value=move || draft.with(|d| d.body.clone())
                ></textarea>
            </div>

            <div class="flex justify-end">
                <button
                    class="btn btn-primary"
                    disabled=move || !can_advance()
                    on:click=on_next
                >
                    "Next: Recipients"
                </button>
            </div>
        </div>
    }
}
