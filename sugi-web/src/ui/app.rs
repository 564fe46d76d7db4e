use sugi_client::{api::EssayId, AdminMode};
use yew::prelude::*;

use crate::{storage::LocalKv, ui, util};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Page {
    Home,
    Board,
    Write,
    Display,
    Detail(EssayId),
}

pub enum AppMsg {
    Navigate(Page),
    ToggleAdmin,
}

pub struct App {
    page: Page,
    admin: AdminMode<LocalKv>,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        App {
            page: Page::Home,
            admin: AdminMode::load(LocalKv),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::Navigate(page) => {
                self.page = page;
            }
            AppMsg::ToggleAdmin => {
                if self.admin.is_active() {
                    if util::confirm("Leave admin mode?") {
                        self.admin.deactivate();
                    }
                } else if let Some(token) = util::prompt("Admin token:") {
                    self.admin.activate(&token);
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let navigate = ctx.link().callback(AppMsg::Navigate);

        // the display page takes over the whole screen, no chrome around it
        if self.page == Page::Display {
            return html! {
                <ui::Display on_exit={ navigate.reform(|()| Page::Board) } />
            };
        }

        let admin_label = if self.admin.is_active() {
            "admin: on"
        } else {
            "admin"
        };
        let page = match self.page {
            Page::Home => html! {
                <ui::Home on_navigate={ navigate.clone() } />
            },
            Page::Board => html! {
                <ui::Board
                    admin_token={ self.admin.token() }
                    on_open={ navigate.reform(Page::Detail) }
                />
            },
            Page::Write => html! {
                <ui::Write on_done={ navigate.reform(|()| Page::Board) } />
            },
            Page::Detail(id) => html! {
                <ui::Detail {id} on_back={ navigate.reform(|()| Page::Board) } />
            },
            Page::Display => unreachable!("handled above"),
        };
        html! {
            <div class="app">
                <header class="app-header">
                    <button onclick={ navigate.reform(|_| Page::Home) }>{ "Home" }</button>
                    <button onclick={ navigate.reform(|_| Page::Board) }>{ "Board" }</button>
                    <button onclick={ navigate.reform(|_| Page::Write) }>{ "Write" }</button>
                    <button onclick={ navigate.reform(|_| Page::Display) }>{ "Display" }</button>
                    <button
                        class="admin-toggle"
                        onclick={ ctx.link().callback(|_| AppMsg::ToggleAdmin) }
                    >
                        { admin_label }
                    </button>
                </header>
                <main>{ page }</main>
            </div>
        }
    }
}
