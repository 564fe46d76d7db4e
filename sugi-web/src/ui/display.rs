use sugi_client::{
    api::{Backend, Error, Essay},
    grid_columns, Direction, DisplayEngine, DisplayQuestion, TransitionStyle, Viewport, FADE_OUT,
};
use wasm_bindgen::{closure::Closure, JsCast};
use yew::prelude::*;

use crate::{api, util};

/// Width below which the slideshow steps question by question
const COMPACT_BREAKPOINT: f64 = 768.0;

fn current_viewport() -> Viewport {
    let width = util::window()
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(COMPACT_BREAKPOINT);
    if width < COMPACT_BREAKPOINT {
        Viewport::Compact
    } else {
        Viewport::Standard
    }
}

#[derive(Clone, PartialEq, Properties)]
pub struct DisplayProps {
    pub on_exit: Callback<()>,
}

pub enum DisplayMsg {
    ReceivedEssays(Result<Vec<Essay>, Error>),
    AutoAdvance { epoch: u32 },
    Navigate(Direction),
    Settled { epoch: u32 },
    ViewportChanged,
    Exit,
}

/// Full-screen slideshow over the essays.
///
/// The engine owns what is shown and when to move on; this component owns
/// the timers. Every scheduled wakeup carries the epoch it was scheduled
/// in, and any state change bumps the epoch, so wakeups from a superseded
/// schedule fall through harmlessly.
pub struct Display {
    engine: DisplayEngine,
    loading: bool,
    epoch: u32,
    keydown: Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>,
    resize: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl Display {
    fn schedule_auto_advance(&mut self, ctx: &Context<Self>) {
        let Some(d) = self.engine.current_duration() else {
            return;
        };
        self.epoch += 1;
        let epoch = self.epoch;
        ctx.link().send_future(async move {
            util::sleep_for(d).await;
            DisplayMsg::AutoAdvance { epoch }
        });
    }

    fn begin_transition(&mut self, ctx: &Context<Self>, direction: Direction) -> bool {
        let t = match direction {
            Direction::Forward => self.engine.advance(),
            Direction::Backward => self.engine.retreat(),
        };
        let Some(t) = t else {
            // empty list or a transition already in flight
            return false;
        };
        self.epoch += 1;
        let epoch = self.epoch;
        let d = t.settle_delay();
        ctx.link().send_future(async move {
            util::sleep_for(d).await;
            DisplayMsg::Settled { epoch }
        });
        true
    }
}

impl Component for Display {
    type Message = DisplayMsg;
    type Properties = DisplayProps;

    fn create(ctx: &Context<Self>) -> Self {
        let client = api::Client::new(util::api_base(), None);
        ctx.link()
            .send_future(
                async move { DisplayMsg::ReceivedEssays(client.list_essays(None).await) },
            );
        Display {
            engine: DisplayEngine::new(Vec::new(), current_viewport()),
            loading: true,
            epoch: 0,
            keydown: None,
            resize: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            DisplayMsg::ReceivedEssays(Ok(essays)) => {
                self.engine = DisplayEngine::from_essays(essays.iter(), current_viewport());
                self.loading = false;
                self.schedule_auto_advance(ctx);
            }
            DisplayMsg::ReceivedEssays(Err(err)) => {
                tracing::error!(?err, "failed fetching essays for display");
                util::alert(&format!("Failed loading essays: {err}"));
                ctx.props().on_exit.emit(());
            }
            DisplayMsg::AutoAdvance { epoch } => {
                if epoch != self.epoch {
                    return false;
                }
                self.begin_transition(ctx, Direction::Forward);
            }
            DisplayMsg::Navigate(direction) => {
                return self.begin_transition(ctx, direction);
            }
            DisplayMsg::Settled { epoch } => {
                if epoch != self.epoch {
                    return false;
                }
                self.engine.commit();
                self.schedule_auto_advance(ctx);
            }
            DisplayMsg::ViewportChanged => {
                let viewport = current_viewport();
                if viewport == self.engine.viewport() {
                    return false;
                }
                self.engine.set_viewport(viewport);
                self.schedule_auto_advance(ctx);
            }
            DisplayMsg::Exit => {
                ctx.props().on_exit.emit(());
            }
        }
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if !first_render {
            return;
        }
        let link = ctx.link().clone();
        let keydown = Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
            match &e.key() as &str {
                "ArrowRight" => link.send_message(DisplayMsg::Navigate(Direction::Forward)),
                "ArrowLeft" => link.send_message(DisplayMsg::Navigate(Direction::Backward)),
                "Escape" => link.send_message(DisplayMsg::Exit),
                _ => (),
            }
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);
        util::window()
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())
            .expect("failed registering keydown listener");
        self.keydown = Some(keydown);

        let link = ctx.link().clone();
        let resize = Closure::wrap(Box::new(move |_: web_sys::Event| {
            link.send_message(DisplayMsg::ViewportChanged);
        }) as Box<dyn FnMut(web_sys::Event)>);
        util::window()
            .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
            .expect("failed registering resize listener");
        self.resize = Some(resize);
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(cb) = self.keydown.take() {
            let _ = util::window()
                .remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
        }
        if let Some(cb) = self.resize.take() {
            let _ = util::window()
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.loading {
            return html! { <div class="display">{ "Loading..." }</div> };
        }
        if self.engine.is_empty() {
            return html! {
                <div class="display">
                    <p>{ "Nothing to display yet." }</p>
                    <button onclick={ ctx.link().callback(|_| DisplayMsg::Exit) }>
                        { "Back" }
                    </button>
                </div>
            };
        }

        let unit = self.engine.current();
        let essay = self
            .engine
            .current_essay()
            .expect("non-empty engine has a current essay");

        let transition_class = self.engine.in_flight().map(|t| match (t.style, t.direction) {
            (TransitionStyle::Fade, _) => "unit-fade",
            (TransitionStyle::Slide, Direction::Forward) => "unit-slide-forward",
            (TransitionStyle::Slide, Direction::Backward) => "unit-slide-backward",
        });
        // the stylesheet animates off these, so css timing always matches
        // the settle delay the engine is actually waiting for
        let transition_timing = self.engine.in_flight().map(|t| {
            format!(
                "--settle-delay: {}ms; --fade-out: {}ms;",
                t.settle_delay().as_millis(),
                FADE_OUT.as_millis()
            )
        });

        let question = |q: &DisplayQuestion| {
            html! {
                <section class="unit-question">
                    <h3>{ q.emoji }{ " " }{ q.label }</h3>
                    <p>{ q.answer.clone() }</p>
                </section>
            }
        };
        let content = match self.engine.viewport() {
            Viewport::Standard => {
                let (page0, page1) = essay.pages();
                let questions = if unit.slot == 0 { page0 } else { page1 };
                let cols = grid_columns(questions.len(), true);
                html! {
                    <div
                        class="unit-grid"
                        style={ format!("grid-template-columns: repeat({cols}, 1fr);") }
                    >
                        {for questions.iter().map(question)}
                    </div>
                }
            }
            Viewport::Compact => {
                let q = &essay.questions[unit.slot.min(essay.questions.len() - 1)];
                html! { <div class="unit-single">{ question(q) }</div> }
            }
        };

        let animating = self.engine.is_animating();
        html! {
            <div class="display">
                <div class={classes!("unit", transition_class)} style={ transition_timing }>
                    { content }
                </div>
                <div class="display-controls">
                    <button
                        disabled={ animating }
                        onclick={
                            ctx.link().callback(|_| DisplayMsg::Navigate(Direction::Backward))
                        }
                    >
                        { "←" }
                    </button>
                    <button
                        disabled={ animating }
                        onclick={
                            ctx.link().callback(|_| DisplayMsg::Navigate(Direction::Forward))
                        }
                    >
                        { "→" }
                    </button>
                </div>
                <footer class="display-footer">
                    <span>{ essay.nickname.as_deref().unwrap_or("anonymous") }</span>
                    <span>{ essay.created_at.format("%Y-%m-%d").to_string() }</span>
                    <span>
                        { format!("{} / {}", unit.essay + 1, self.engine.essays().len()) }
                    </span>
                    <span class="display-hint">{ "← → to navigate, Esc to leave" }</span>
                </footer>
            </div>
        }
    }
}
