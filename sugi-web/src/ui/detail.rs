use sugi_client::api::{Backend, Comment, Error, Essay, EssayId, NewComment};
use yew::prelude::*;

use crate::{api, util};

#[derive(Clone, PartialEq, Properties)]
pub struct DetailProps {
    pub id: EssayId,
    pub on_back: Callback<()>,
}

pub enum DetailMsg {
    Received(Result<(Option<Essay>, Vec<Comment>), Error>),
    ToggleLike,
    LikesChanged(Result<i64, Error>),
    SubmitComment,
    CommentPosted(Result<Comment, Error>),
}

pub struct Detail {
    essay: Option<Essay>,
    comments: Vec<Comment>,
    loading: bool,
    liked: bool,
    posting: bool,
    comment_nickname_ref: NodeRef,
    comment_content_ref: NodeRef,
}

fn client() -> api::Client {
    api::Client::new(util::api_base(), None)
}

impl Component for Detail {
    type Message = DetailMsg;
    type Properties = DetailProps;

    fn create(ctx: &Context<Self>) -> Self {
        let id = ctx.props().id;
        ctx.link().send_future(async move {
            let client = client();
            let res = async {
                let essay = client.get_essay(id).await?;
                let comments = match &essay {
                    Some(_) => client.list_comments(id).await?,
                    None => Vec::new(),
                };
                Ok::<_, Error>((essay, comments))
            };
            DetailMsg::Received(res.await)
        });
        Detail {
            essay: None,
            comments: Vec::new(),
            loading: true,
            liked: false,
            posting: false,
            comment_nickname_ref: NodeRef::default(),
            comment_content_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            DetailMsg::Received(Ok((essay, comments))) => {
                if essay.is_none() {
                    util::alert("This essay is gone.");
                    ctx.props().on_back.emit(());
                }
                self.essay = essay;
                self.comments = comments;
                self.loading = false;
            }
            DetailMsg::Received(Err(err)) => {
                tracing::error!(?err, "failed fetching essay");
                util::alert(&format!("Failed loading the essay: {err}"));
                ctx.props().on_back.emit(());
            }
            DetailMsg::ToggleLike => {
                let id = ctx.props().id;
                let unlike = self.liked;
                // flip optimistically; LikesChanged carries the real count
                self.liked = !self.liked;
                ctx.link().send_future(async move {
                    let client = client();
                    let res = if unlike {
                        client.unlike_essay(id).await
                    } else {
                        client.like_essay(id).await
                    };
                    DetailMsg::LikesChanged(res)
                });
            }
            DetailMsg::LikesChanged(Ok(count)) => {
                if let Some(essay) = &mut self.essay {
                    essay.likes_count = count;
                }
            }
            DetailMsg::LikesChanged(Err(err)) => {
                tracing::error!(?err, "like toggle failed");
                self.liked = !self.liked;
            }
            DetailMsg::SubmitComment => {
                if self.posting {
                    return false;
                }
                let nickname = self
                    .comment_nickname_ref
                    .cast::<web_sys::HtmlInputElement>()
                    .map(|e| e.value())
                    .filter(|n| !n.trim().is_empty());
                let content = self
                    .comment_content_ref
                    .cast::<web_sys::HtmlTextAreaElement>()
                    .map(|e| e.value())
                    .unwrap_or_default();
                let c = NewComment { nickname, content };
                if let Err(err) = c.validate() {
                    util::alert(&format!("{err}"));
                    return false;
                }
                self.posting = true;
                let id = ctx.props().id;
                ctx.link().send_future(async move {
                    DetailMsg::CommentPosted(client().create_comment(id, c).await)
                });
            }
            DetailMsg::CommentPosted(Ok(comment)) => {
                self.comments.push(comment);
                self.posting = false;
                if let Some(e) = self.comment_content_ref.cast::<web_sys::HtmlTextAreaElement>() {
                    e.set_value("");
                }
                if let Some(essay) = &mut self.essay {
                    essay.comments_count += 1;
                }
            }
            DetailMsg::CommentPosted(Err(err)) => {
                tracing::error!(?err, "comment submission failed");
                util::alert(&format!("Failed posting your comment: {err}"));
                self.posting = false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! { <p>{ "Loading..." }</p> };
        }
        let Some(essay) = &self.essay else {
            return html! {};
        };
        let heart = if self.liked { "♥" } else { "♡" };
        html! {
            <div class="detail">
                <button onclick={ ctx.props().on_back.reform(|_| ()) }>{ "Back" }</button>
                <h2>{ essay.nickname.as_deref().unwrap_or("anonymous") }</h2>
                <p class="detail-date">
                    { essay.created_at.format("%Y-%m-%d %H:%M").to_string() }
                </p>
                {for essay.answered_questions().iter().map(|q| html! {
                    <section class="detail-answer">
                        <h3>{ q.question.emoji }{ " " }{ q.question.label }</h3>
                        <p>{ q.answer }</p>
                    </section>
                })}
                <button class="like" onclick={ ctx.link().callback(|_| DetailMsg::ToggleLike) }>
                    { format!("{heart} {}", essay.likes_count) }
                </button>
                <h3>{ format!("Comments ({})", self.comments.len()) }</h3>
                <ul class="comments">
                    {for self.comments.iter().map(|c| html! {
                        <li>
                            <b>{ c.nickname.as_deref().unwrap_or("anonymous") }</b>
                            { " " }{ &c.content }
                        </li>
                    })}
                </ul>
                <div class="comment-form">
                    <input
                        ref={ self.comment_nickname_ref.clone() }
                        type="text"
                        placeholder="nickname (optional)"
                    />
                    <textarea ref={ self.comment_content_ref.clone() } rows="2" />
                    <button
                        disabled={ self.posting }
                        onclick={ ctx.link().callback(|_| DetailMsg::SubmitComment) }
                    >
                        { "Post" }
                    </button>
                </div>
            </div>
        }
    }
}
