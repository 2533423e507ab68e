/// Side panel UI for Page Clipper

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use serde::Deserialize;
use crate::domain::SiteState;
use crate::export::{export_filename, export_plan};
use crate::messages::Message;
use crate::operations::DragSession;
use crate::storage::{storage_usage, StorageData, StorageError, LOCAL_QUOTA_BYTES, STORAGE_KEY};
use crate::ui::components::ItemCard;

// Import JS bridge functions
#[wasm_bindgen(module = "/panel.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getBytesInUse() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn broadcast(message: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendToWorker(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn exportPdf(plan: &str, filename: &str) -> Result<(), JsValue>;

    fn onMessage(callback: &js_sys::Function);

    fn onActiveTabChanged(callback: &js_sys::Function);
}

#[derive(Debug, Clone, Deserialize)]
struct ActiveTab {
    url: String,
}

/// Reply of the background worker to a `toggle_site` request
#[derive(Debug, Clone, Deserialize)]
struct ToggleReply {
    enabled: Option<bool>,
}

#[derive(Clone, PartialEq)]
enum PanelState {
    Loading,
    Idle,
    Busy(String),
    Error(String),
}

impl PanelState {
    /// Export and Clear wait for loads and running work, not for errors
    fn blocks_actions(&self) -> bool {
        matches!(self, PanelState::Loading | PanelState::Busy(_))
    }
}

#[function_component(SidePanel)]
pub fn side_panel() -> Html {
    let state = use_state(|| PanelState::Loading);
    let storage = use_state(StorageData::new);
    let active_url = use_state(|| None::<String>);
    let storage_warning = use_state(|| None::<String>);
    // Lives as long as the panel is open
    let drag = use_mut_ref(DragSession::new);
    let dragging = use_state(|| None::<String>);

    // Load storage and the active tab on mount, then follow broadcasts
    {
        let state = state.clone();
        let storage = storage.clone();
        let active_url = active_url.clone();
        let storage_warning = storage_warning.clone();

        use_effect_with((), move |_| {
            reload(state.clone(), storage.clone(), storage_warning.clone());

            {
                let active_url = active_url.clone();
                spawn_local(async move {
                    match get_active_tab().await {
                        Ok(tab) => active_url.set(Some(tab.url)),
                        Err(e) => log::warn!("{}", e),
                    }
                });
            }

            let listener = Closure::wrap(Box::new(move |message_js: JsValue| {
                match serde_wasm_bindgen::from_value::<Message>(message_js) {
                    Ok(Message::ItemsUpdated) | Ok(Message::SiteStateChanged { .. }) => {
                        reload(state.clone(), storage.clone(), storage_warning.clone());
                    }
                    Ok(_) => {}
                    Err(e) => log::debug!("Ignoring message: {:?}", e),
                }
            }) as Box<dyn Fn(JsValue)>);

            onMessage(listener.as_ref().unchecked_ref());
            // The runtime keeps calling it for the lifetime of the page
            listener.forget();

            let tab_listener = Closure::wrap(Box::new(move |url: String| {
                active_url.set(Some(url));
            }) as Box<dyn Fn(String)>);

            onActiveTabChanged(tab_listener.as_ref().unchecked_ref());
            tab_listener.forget();

            || ()
        });
    }

    let site_state = match &*active_url {
        Some(url) => crate::domain::site_state(url, &storage.settings.disabled_domains),
        None => SiteState::Enabled,
    };

    // Toggle capture for whichever tab is active right now
    let on_toggle_site = {
        let state = state.clone();
        let storage = storage.clone();
        let active_url = active_url.clone();
        let storage_warning = storage_warning.clone();

        Callback::from(move |_| {
            let state = state.clone();
            let storage = storage.clone();
            let active_url = active_url.clone();
            let storage_warning = storage_warning.clone();

            spawn_local(async move {
                let url = match get_active_tab().await {
                    Ok(tab) => tab.url,
                    Err(e) => {
                        state.set(PanelState::Error(e));
                        return;
                    }
                };
                active_url.set(Some(url.clone()));

                match request_toggle(&url).await {
                    Ok(Some(enabled)) => {
                        log::info!("Capture {} for {}", if enabled { "enabled" } else { "disabled" }, url);
                        reload(state, storage, storage_warning);
                    }
                    Ok(None) => log::info!("Nothing to toggle for {}", url),
                    Err(e) => state.set(PanelState::Error(e)),
                }
            });
        })
    };

    // Delete an item
    let on_delete = {
        let state = state.clone();
        let storage = storage.clone();

        Callback::from(move |item_id: String| {
            let mut new_storage = (*storage).clone();
            if !new_storage.remove_item(&item_id) {
                return;
            }
            storage.set(new_storage.clone());
            persist(state.clone(), new_storage);
        })
    };

    let on_drag_start = {
        let drag = drag.clone();
        let dragging = dragging.clone();

        Callback::from(move |item_id: String| {
            drag.borrow_mut().begin(&item_id);
            dragging.set(drag.borrow().source().map(str::to_string));
        })
    };

    let on_drag_end = {
        let drag = drag.clone();
        let dragging = dragging.clone();

        Callback::from(move |_: ()| {
            drag.borrow_mut().cancel();
            dragging.set(None);
        })
    };

    let on_move = {
        let state = state.clone();
        let storage = storage.clone();

        Callback::from(move |(from, to): (usize, usize)| {
            let mut new_storage = (*storage).clone();
            if new_storage.move_item(from, to) {
                storage.set(new_storage.clone());
                persist(state.clone(), new_storage);
            }
        })
    };

    let on_drop = {
        let state = state.clone();
        let storage = storage.clone();
        let drag = drag.clone();
        let dragging = dragging.clone();

        Callback::from(move |target_id: String| {
            dragging.set(None);
            let mut new_storage = (*storage).clone();
            if drag.borrow_mut().drop_on(&mut new_storage.items, &target_id) {
                storage.set(new_storage.clone());
                persist(state.clone(), new_storage);
            }
        })
    };

    let on_clear = {
        let state = state.clone();
        let storage = storage.clone();

        Callback::from(move |_| {
            let mut new_storage = (*storage).clone();
            if new_storage.clear() == 0 {
                return;
            }
            storage.set(new_storage.clone());
            persist(state.clone(), new_storage);
        })
    };

    let on_export = {
        let state = state.clone();
        let storage = storage.clone();

        Callback::from(move |_| {
            let plan = export_plan(&storage.items, &storage.settings.pdf);
            let json = match serde_json::to_string(&plan) {
                Ok(json) => json,
                Err(e) => {
                    state.set(PanelState::Error(format!("Failed to build export: {}", e)));
                    return;
                }
            };
            let filename = export_filename(js_sys::Date::now());

            let state = state.clone();
            state.set(PanelState::Busy("Exporting PDF...".to_string()));
            spawn_local(async move {
                match exportPdf(&json, &filename).await {
                    Ok(_) => state.set(PanelState::Idle),
                    Err(e) => state.set(PanelState::Error(format!("Export failed: {:?}", e))),
                }
            });
        })
    };

    let is_busy = state.blocks_actions();
    let is_empty = storage.items.is_empty();

    html! {
        <div class="padding-20">
            <div class="header">
                <h1 class="panel-title">{"Page Clipper"}</h1>
                <Button
                    onclick={on_toggle_site}
                    disabled={active_url.is_none()}
                    variant={ButtonVariant::Secondary}
                    size={ButtonSize::Small}
                >
                    {if site_state.is_enabled() { "Disable on this site" } else { "Enable on this site" }}
                </Button>
            </div>

            // Storage warning
            if let Some(warning) = (*storage_warning).clone() {
                <Alert r#type={AlertType::Warning} title={warning} inline={true}>
                </Alert>
            }

            // Status display
            {match &*state {
                PanelState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading clips..."}</p>
                    </div>
                },
                PanelState::Busy(msg) => html! {
                    <div class="message-top-margin">
                        <Spinner />
                        <p class="message-text">{msg}</p>
                    </div>
                },
                PanelState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                PanelState::Idle => html! {}
            }}

            if is_empty {
                <div class="empty-state">
                    <p>{"Nothing captured yet."}</p>
                    <p class="empty-state-hint">{"Right-click a link, image or selection to add it."}</p>
                </div>
            } else {
                <div class="clips-list">
                    {for storage.items.iter().enumerate().map(|(position, item)| html! {
                        <ItemCard
                            key={item.id.clone()}
                            item={item.clone()}
                            {position}
                            count={storage.items.len()}
                            dragging={dragging.as_deref() == Some(item.id.as_str())}
                            on_delete={on_delete.clone()}
                            on_drag_start={on_drag_start.clone()}
                            on_drop={on_drop.clone()}
                            on_drag_end={on_drag_end.clone()}
                            on_move={on_move.clone()}
                        />
                    })}
                </div>
            }

            <div class="flex-column-gap">
                <Button onclick={on_export} disabled={is_busy || is_empty} variant={ButtonVariant::Primary} block={true}>
                    {"Export to PDF"}
                </Button>
                <Button onclick={on_clear} disabled={is_busy || is_empty} variant={ButtonVariant::Danger} block={true}>
                    {"Clear all"}
                </Button>
            </div>

            <p class="footer-panel">
                {format!("{} items", storage.items.len())}
            </p>
        </div>
    }
}

// Helper functions

fn reload(
    state: UseStateHandle<PanelState>,
    storage: UseStateHandle<StorageData>,
    storage_warning: UseStateHandle<Option<String>>,
) {
    spawn_local(async move {
        match load_storage().await {
            Ok(data) => {
                storage.set(data);
                state.set(PanelState::Idle);
            }
            Err(e) => {
                state.set(PanelState::Error(e.to_string()));
            }
        }

        match get_bytes_in_use().await {
            Ok(bytes) => {
                let usage = storage_usage(bytes, LOCAL_QUOTA_BYTES);
                if usage.near_limit {
                    storage_warning.set(Some(format!("Storage {}% full!", usage.percent_used)));
                } else {
                    storage_warning.set(None);
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    });
}

/// Save in the background and tell open views the collection changed
fn persist(state: UseStateHandle<PanelState>, storage: StorageData) {
    spawn_local(async move {
        if let Err(e) = save_storage(&storage).await {
            state.set(PanelState::Error(e.to_string()));
            return;
        }
        if let Err(e) = send(&Message::ItemsUpdated).await {
            log::warn!("{}", e);
        }
    });
}

async fn load_storage() -> Result<StorageData, StorageError> {
    let storage_js = getStorage(STORAGE_KEY)
        .await
        .map_err(|e| StorageError::Bridge(format!("{:?}", e)))?;

    StorageData::from_js(storage_js)
}

async fn save_storage(storage: &StorageData) -> Result<(), StorageError> {
    let storage_js = storage.to_js()?;

    setStorage(STORAGE_KEY, storage_js)
        .await
        .map_err(|e| StorageError::Bridge(format!("{:?}", e)))
}

async fn get_bytes_in_use() -> Result<u64, String> {
    let bytes_js = getBytesInUse()
        .await
        .map_err(|e| format!("Failed to read storage usage: {:?}", e))?;

    bytes_js
        .as_f64()
        .map(|bytes| bytes.max(0.0) as u64)
        .ok_or_else(|| "Storage usage is not a number".to_string())
}

async fn get_active_tab() -> Result<ActiveTab, String> {
    let tab_js = getActiveTab()
        .await
        .map_err(|e| format!("Failed to get active tab: {:?}", e))?;

    serde_wasm_bindgen::from_value(tab_js)
        .map_err(|e| format!("Failed to parse tab: {:?}", e))
}

/// Ask the background worker to toggle the site of `url`, which owns the write
async fn request_toggle(url: &str) -> Result<Option<bool>, String> {
    let message = Message::ToggleSite { url: url.to_string() };
    let message_js = serde_wasm_bindgen::to_value(&message)
        .map_err(|e| format!("Failed to serialize message: {:?}", e))?;

    let reply_js = sendToWorker(message_js)
        .await
        .map_err(|e| format!("Toggle failed: {:?}", e))?;

    let reply: ToggleReply = serde_wasm_bindgen::from_value(reply_js)
        .map_err(|e| format!("Failed to parse toggle reply: {:?}", e))?;
    Ok(reply.enabled)
}

async fn send(message: &Message) -> Result<(), String> {
    let message_js = serde_wasm_bindgen::to_value(message)
        .map_err(|e| format!("Failed to serialize message: {:?}", e))?;

    broadcast(message_js)
        .await
        .map_err(|e| format!("Broadcast failed: {:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_does_not_block_actions() {
        assert!(PanelState::Loading.blocks_actions());
        assert!(PanelState::Busy("Exporting PDF...".to_string()).blocks_actions());
        assert!(!PanelState::Idle.blocks_actions());
        assert!(!PanelState::Error("Export failed".to_string()).blocks_actions());
    }
}
