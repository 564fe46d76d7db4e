use sugi_client::api::{Backend, Error, Essay, QUESTIONS};
use yew::prelude::*;

use crate::{api, ui::EssayCard, ui::Page, util};

/// How many essays the home page previews
const RECENT_LIMIT: usize = 12;

#[derive(Clone, PartialEq, Properties)]
pub struct HomeProps {
    pub on_navigate: Callback<Page>,
}

pub enum HomeMsg {
    ReceivedEssays(Result<Vec<Essay>, Error>),
}

pub struct Home {
    recent: Vec<Essay>,
}

impl Component for Home {
    type Message = HomeMsg;
    type Properties = HomeProps;

    fn create(ctx: &Context<Self>) -> Self {
        let client = api::Client::new(util::api_base(), None);
        ctx.link().send_future(async move {
            HomeMsg::ReceivedEssays(client.list_essays(Some(RECENT_LIMIT)).await)
        });
        Home { recent: Vec::new() }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            HomeMsg::ReceivedEssays(Ok(essays)) => {
                self.recent = essays;
            }
            HomeMsg::ReceivedEssays(Err(err)) => {
                // the home page still works without the preview strip
                tracing::warn!(?err, "failed fetching recent essays");
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let navigate = &ctx.props().on_navigate;
        let recent = (!self.recent.is_empty()).then(|| {
            html! {
                <>
                    <h2>{ "Recent essays" }</h2>
                    <div class="home-recent">
                        {for self.recent.iter().map(|e| html! {
                            <EssayCard
                                key={ e.id.0.to_string() }
                                essay={ e.clone() }
                                admin={ false }
                                selected={ false }
                                on_open={ navigate.reform(Page::Detail) }
                                on_toggle_select={ Callback::noop() }
                            />
                        })}
                    </div>
                </>
            }
        });
        html! {
            <div class="home">
                <h1>{ "Seven questions, one essay" }</h1>
                <p>{ "Answer as many of the questions below as you like, \
                      and your essay joins the board." }</p>
                <ul class="question-preview">
                    {for QUESTIONS.iter().map(|q| html! {
                        <li>{ q.emoji }{ " " }{ q.label }</li>
                    })}
                </ul>
                <div class="home-actions">
                    <button onclick={ navigate.reform(|_| Page::Write) }>
                        { "Write yours" }
                    </button>
                    <button onclick={ navigate.reform(|_| Page::Board) }>
                        { "Read the board" }
                    </button>
                </div>
                { for recent }
            </div>
        }
    }
}
