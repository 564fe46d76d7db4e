use std::collections::HashSet;

use sugi_client::{
    api::{Backend, Error, Essay, EssayId},
    delete_all, BoardState,
};
use yew::prelude::*;

use crate::{api, storage::LocalKv, ui::EssayCard, util};

#[derive(Clone, PartialEq, Properties)]
pub struct BoardProps {
    pub admin_token: Option<String>,
    pub on_open: Callback<EssayId>,
}

pub enum BoardMsg {
    ReceivedEssays(Result<Vec<Essay>, Error>),
    ToggleSelect(EssayId),
    DeleteSelected,
    DeleteDone {
        deleted: Vec<EssayId>,
        error: Option<Error>,
    },
}

pub struct Board {
    state: BoardState<LocalKv>,
    selected: HashSet<EssayId>,
    loading: bool,
    deleting: bool,
}

impl Board {
    fn client(&self, ctx: &Context<Self>) -> api::Client {
        api::Client::new(util::api_base(), ctx.props().admin_token.clone())
    }

    fn fetch(&self, ctx: &Context<Self>) {
        let client = self.client(ctx);
        ctx.link()
            .send_future(
                async move { BoardMsg::ReceivedEssays(client.list_essays(None).await) },
            );
    }
}

impl Component for Board {
    type Message = BoardMsg;
    type Properties = BoardProps;

    fn create(ctx: &Context<Self>) -> Self {
        let board = Board {
            state: BoardState::load(LocalKv),
            selected: HashSet::new(),
            loading: true,
            deleting: false,
        };
        board.fetch(ctx);
        board
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            BoardMsg::ReceivedEssays(Ok(essays)) => {
                self.state.reconcile(essays);
                self.loading = false;
            }
            BoardMsg::ReceivedEssays(Err(err)) => {
                tracing::error!(?err, "failed fetching essays");
                self.loading = false;
                util::alert(&format!("Failed loading the board: {err}"));
            }
            BoardMsg::ToggleSelect(id) => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
            }
            BoardMsg::DeleteSelected => {
                if self.deleting || self.selected.is_empty() {
                    return false;
                }
                let n = self.selected.len();
                if !util::confirm(&format!("Delete {n} essay(s)?")) {
                    return false;
                }
                self.deleting = true;
                let ids: Vec<EssayId> = self.selected.iter().copied().collect();
                let client = self.client(ctx);
                ctx.link().send_future(async move {
                    let (deleted, error) = delete_all(&client, &ids).await;
                    BoardMsg::DeleteDone { deleted, error }
                });
            }
            BoardMsg::DeleteDone { deleted, error } => {
                for id in deleted {
                    self.state.mark_deleted(id);
                    self.selected.remove(&id);
                }
                self.deleting = false;
                if let Some(err) = error {
                    util::alert(&format!("Some deletions failed: {err}"));
                }
                // refetch so the next reconcile reflects what actually
                // happened server-side
                self.fetch(ctx);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! { <p class="board-loading">{ "Loading..." }</p> };
        }
        let admin = ctx.props().admin_token.is_some();
        let admin_bar = admin.then(|| {
            html! {
                <div class="admin-bar">
                    <button
                        disabled={ self.deleting || self.selected.is_empty() }
                        onclick={ ctx.link().callback(|_| BoardMsg::DeleteSelected) }
                    >
                        { format!("Delete selected ({})", self.selected.len()) }
                    </button>
                </div>
            }
        });
        let empty = self
            .state
            .essays()
            .is_empty()
            .then(|| html! { <p>{ "No essays yet. Write the first one!" }</p> });
        html! {
            <div class="board">
                { for admin_bar }
                { for empty }
                <div class="board-grid">
                    {for self.state.essays().iter().map(|e| html! {
                        <EssayCard
                            key={ e.id.0.to_string() }
                            essay={ e.clone() }
                            {admin}
                            selected={ self.selected.contains(&e.id) }
                            on_open={ ctx.props().on_open.clone() }
                            on_toggle_select={ ctx.link().callback(BoardMsg::ToggleSelect) }
                        />
                    })}
                </div>
            </div>
        }
    }
}
