//! Tag Autocomplete Component
//!
//! Comma-separated tag input with fuzzy suggestions from existing tags.

use leptos::prelude::*;

use crate::models::Tag;

const MAX_SUGGESTIONS: usize = 5;

/// Simple fuzzy match: check if query chars appear in order in the target
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let query = query.to_lowercase();
    let target = target.to_lowercase();

    let mut target_chars = target.chars();
    for query_char in query.chars() {
        loop {
            match target_chars.next() {
                Some(c) if c == query_char => break,
                Some(_) => continue,
                None => return false,
            }
        }
    }
    true
}

/// Text after the last comma
fn current_segment(input: &str) -> &str {
    input.rsplit(',').next().unwrap_or("").trim()
}

/// Replace the text after the last comma with `new_segment`
fn replace_current_segment(input: &str, new_segment: &str) -> String {
    match input.rfind(',') {
        Some(pos) => format!("{}, {}", &input[..pos], new_segment),
        None => new_segment.to_string(),
    }
}

/// Existing tags matching the segment being typed, skipping ones already entered
fn suggest(all_tags: &[Tag], input: &str) -> Vec<Tag> {
    let segment = current_segment(input);
    if segment.is_empty() {
        return Vec::new();
    }
    let entered: Vec<String> = input
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .collect();
    let entered = &entered[..entered.len().saturating_sub(1)];
    all_tags
        .iter()
        .filter(|tag| fuzzy_match(segment, &tag.name))
        .filter(|tag| !entered.contains(&tag.name.to_lowercase()))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

/// Tag input bound to `value`
///
/// Props:
/// - all_tags: tags offered as suggestions
/// - value: the comma-separated input text
#[component]
pub fn TagAutocomplete(all_tags: ReadSignal<Vec<Tag>>, value: RwSignal<String>) -> impl IntoView {
    let (selected_idx, set_selected_idx) = signal(0usize);

    let suggestions = move || all_tags.with(|tags| suggest(tags, &value.get()));

    let accept = move |name: String| {
        value.update(|input| *input = format!("{}, ", replace_current_segment(input, &name)));
        set_selected_idx.set(0);
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let sugg = suggestions();
        if sugg.is_empty() {
            return;
        }
        let sel = selected_idx.get();
        match ev.key().as_str() {
            "Tab" | "Enter" => {
                ev.prevent_default();
                if let Some(tag) = sugg.get(sel) {
                    accept(tag.name.clone());
                }
            }
            "ArrowDown" => {
                ev.prevent_default();
                if sel + 1 < sugg.len() {
                    set_selected_idx.set(sel + 1);
                }
            }
            "ArrowUp" => {
                ev.prevent_default();
                set_selected_idx.set(sel.saturating_sub(1));
            }
            _ => {}
        }
    };

    view! {
        <div class="tag-input-wrapper">
            <input
                type="text"
                name="tags"
                placeholder="bug, ui, export"
                autocomplete="off"
                prop:value=move || value.get()
                on:input=move |ev| {
                    value.set(event_target_value(&ev));
                    set_selected_idx.set(0);
                }
                on:keydown=on_keydown
            />
            {move || {
                let sugg = suggestions();
                if sugg.is_empty() {
                    return view! { <div></div> }.into_any();
                }
                let selected = selected_idx.get();
                view! {
                    <div class="autocomplete-list">
                        {sugg.into_iter().enumerate().map(|(i, tag)| {
                            let name = tag.name.clone();
                            view! {
                                <button
                                    type="button"
                                    class=if i == selected { "autocomplete-item selected" } else { "autocomplete-item" }
                                    on:click=move |ev| {
                                        ev.prevent_default();
                                        accept(name.clone());
                                    }
                                >
                                    {tag.name}
                                </button>
                            }
                        }).collect_view()}
                    </div>
                }.into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<Tag> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Tag { id: i as u32 + 1, name: name.to_string() })
            .collect()
    }

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("exp", "export"));
        assert!(fuzzy_match("ept", "Export"));
        assert!(!fuzzy_match("xe", "export"));
    }

    #[test]
    fn test_segments() {
        assert_eq!(current_segment("ui, bu"), "bu");
        assert_eq!(replace_current_segment("ui, bu", "bug"), "ui, bug");
        assert_eq!(replace_current_segment("bu", "bug"), "bug");
    }

    #[test]
    fn test_suggest_skips_entered_tags() {
        let all = tags(&["ui", "ux", "bug"]);
        let names: Vec<String> = suggest(&all, "ui, x").into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["ux"]);
        assert!(suggest(&all, "ui, ").is_empty());
    }
}
