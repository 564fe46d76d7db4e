use sugi_client::api::{Backend, Error, Essay, EssayForm, ANSWER_COUNT, QUESTIONS};
use yew::prelude::*;

use crate::{api, util};

#[derive(Clone, PartialEq, Properties)]
pub struct WriteProps {
    pub on_done: Callback<()>,
}

pub enum WriteMsg {
    Submit,
    Done(Result<Essay, Error>),
}

pub struct Write {
    nickname_ref: NodeRef,
    answer_refs: [NodeRef; ANSWER_COUNT],
    submitting: bool,
}

impl Write {
    fn form(&self) -> EssayForm {
        let nickname = self
            .nickname_ref
            .cast::<web_sys::HtmlInputElement>()
            .map(|e| e.value())
            .filter(|n| !n.trim().is_empty());
        let answers = self.answer_refs.clone().map(|r| {
            r.cast::<web_sys::HtmlTextAreaElement>()
                .map(|e| e.value())
                .unwrap_or_default()
        });
        EssayForm { nickname, answers }
    }
}

impl Component for Write {
    type Message = WriteMsg;
    type Properties = WriteProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Write {
            nickname_ref: NodeRef::default(),
            answer_refs: std::array::from_fn(|_| NodeRef::default()),
            submitting: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            WriteMsg::Submit => {
                if self.submitting {
                    return false;
                }
                let form = self.form();
                if let Err(err) = form.validate() {
                    util::alert(&format!("{err}"));
                    return false;
                }
                self.submitting = true;
                let client = api::Client::new(util::api_base(), None);
                ctx.link().send_future(async move {
                    WriteMsg::Done(client.create_essay(form.normalized()).await)
                });
            }
            WriteMsg::Done(Ok(_)) => {
                util::alert("Your essay is on the board now.");
                ctx.props().on_done.emit(());
            }
            WriteMsg::Done(Err(err)) => {
                tracing::error!(?err, "essay submission failed");
                util::alert(&format!("Failed saving your essay: {err}"));
                self.submitting = false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="write">
                <h2>{ "Write your essay" }</h2>
                <label>
                    { "Nickname (optional)" }
                    <input
                        ref={ self.nickname_ref.clone() }
                        type="text"
                        placeholder="anonymous"
                    />
                </label>
                {for QUESTIONS.iter().zip(self.answer_refs.iter()).map(|(q, r)| html! {
                    <label class="write-question">
                        { q.emoji }{ " " }{ q.label }
                        <textarea ref={ r.clone() } rows="4" />
                    </label>
                })}
                <button
                    disabled={ self.submitting }
                    onclick={ ctx.link().callback(|_| WriteMsg::Submit) }
                >
                    { if self.submitting { "Saving..." } else { "Submit" } }
                </button>
            </div>
        }
    }
}
