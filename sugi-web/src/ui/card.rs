use sugi_client::api::{Essay, EssayId};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct EssayCardProps {
    pub essay: Essay,
    pub admin: bool,
    pub selected: bool,
    pub on_open: Callback<EssayId>,
    pub on_toggle_select: Callback<EssayId>,
}

#[function_component(EssayCard)]
pub fn essay_card(p: &EssayCardProps) -> Html {
    let id = p.essay.id;
    let preview = p
        .essay
        .answered_questions()
        .first()
        .map(|q| format!("{} {}", q.question.emoji, q.answer))
        .unwrap_or_default();
    let admin_controls = p.admin.then(|| {
        html! {
            <input
                type="checkbox"
                checked={ p.selected }
                onclick={ p.on_toggle_select.reform(move |e: web_sys::MouseEvent| {
                    e.stop_propagation();
                    id
                }) }
            />
        }
    });
    html! {
        <article
            class={classes!("essay-card", p.selected.then(|| "essay-card-selected"))}
            onclick={ p.on_open.reform(move |_| id) }
        >
            { for admin_controls }
            <h3>{ p.essay.nickname.as_deref().unwrap_or("anonymous") }</h3>
            <p class="essay-preview">{ preview }</p>
            <footer>
                <span>{ p.essay.created_at.format("%Y-%m-%d").to_string() }</span>
                <span>{ format!("♥ {}", p.essay.likes_count) }</span>
                <span>{ format!("💬 {}", p.essay.comments_count) }</span>
            </footer>
        </article>
    }
}
