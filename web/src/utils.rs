use chrono::{DateTime, Utc};
use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use yew::prelude::*;

/// Types persisted in `localStorage` under a fixed key.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) fn local_load<T: StorageKey + DeserializeOwned>() -> Option<T> {
    match LocalStorage::get(T::KEY) {
        Ok(value) => Some(value),
        Err(err) => {
            log::debug!("nothing usable stored at {}: {:?}", T::KEY, err);
            None
        }
    }
}

pub(crate) trait LocalOrDefault {
    fn local_or_default() -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> Self {
        local_load().unwrap_or_default()
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T: StorageKey + Serialize> LocalSave for T {
    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attach the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Coin flip backed by JavaScript's Math.random
pub(crate) fn js_random_bool() -> bool {
    js_sys::Math::random() < 0.5
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

pub(crate) fn current_year() -> u32 {
    js_sys::Date::new_0().get_full_year()
}
