use crate::game::{GameProps, GameView};
use crate::theme::Theme;
use crate::utils::current_year;
use yew::prelude::*;

const TITLE: &str = "Tic-Tac-Toe Trainer";

#[function_component]
fn Header() -> Html {
    let theme = use_state(Theme::current);
    let on_toggle = {
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| {
            let next = theme.toggled();
            next.apply();
            theme.set(next);
        })
    };
    let toggle_label = match *theme {
        Theme::Light => "Dark mode",
        Theme::Dark => "Light mode",
    };

    html! {
        <header>
            <nav>
                <ul>
                    <li><strong>{TITLE}</strong></li>
                </ul>
                <ul>
                    <li><a href="/">{"Home"}</a></li>
                    <li><button class="secondary" onclick={on_toggle}>{toggle_label}</button></li>
                </ul>
            </nav>
        </header>
    }
}

#[function_component]
fn Footer() -> Html {
    html! {
        <footer>
            <small>{format!("© {} {}. All rights reserved.", current_year(), TITLE)}</small>
            <small>{"Built to make you smarter"}</small>
        </footer>
    }
}

#[function_component]
pub(crate) fn App(props: &GameProps) -> Html {
    html! {
        <>
            <Header/>
            <main>
                <hgroup>
                    <h1>{TITLE}</h1>
                    <p>{"Challenge your mind with the classic strategy game"}</p>
                </hgroup>
                <section id="game">
                    <GameView ..props.clone()/>
                </section>
            </main>
            <Footer/>
        </>
    }
}
