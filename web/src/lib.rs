use clap::Parser;
use wasm_bindgen::prelude::*;

mod api;
mod game;
mod layout;
mod session;
mod theme;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

impl Args {
    /// Arguments come from the URL fragment, e.g. `#--api-url=https://host/api&--human=O&-vv`.
    fn from_location_hash(hash: &str) -> Result<Self, clap::Error> {
        let args = hash.trim_start_matches('#').split('&').filter(|arg| !arg.is_empty());
        Self::try_parse_from(std::iter::once("").chain(args))
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::from_location_hash(&location_hash).unwrap_or_else(|err| {
        gloo::console::warn!(format!("ignoring URL arguments: {err}"));
        Args::parse_from([""])
    });
    if let Some(log_level) = args.verbose.log_level()
        && let Err(err) = console_log::init_with_level(log_level)
    {
        gloo::console::error!(format!("could not initialize logger: {err}"));
    }

    theme::Theme::init();

    let Some(root) = document().get_element_by_id("app") else {
        log::error!("could not find id=\"app\" element");
        return;
    };

    log::debug!("App started");
    yew::Renderer::<layout::App>::with_root_and_props(root, args.game).render();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_core::Player;

    #[test]
    fn empty_hash_uses_defaults() {
        let args = Args::from_location_hash("").unwrap();

        assert_eq!(args.game.api_url, game::API_URL);
        assert_eq!(args.game.human, Player::X);
        assert!(!args.game.offline);
    }

    #[test]
    fn hash_arguments_override_defaults() {
        let args =
            Args::from_location_hash("#--api-url=https://example.test/api&--human=O&--offline")
                .unwrap();

        assert_eq!(args.game.api_url, "https://example.test/api");
        assert_eq!(args.game.human, Player::O);
        assert!(args.game.offline);
    }

    #[test]
    fn unknown_argument_is_an_error() {
        assert!(Args::from_location_hash("#--bogus").is_err());
    }
}
