/// Reusable UI components

use yew::prelude::*;
use patternfly_yew::prelude::*;
use crate::clip_data::{ClipItem, ClipKind};

#[derive(Properties, PartialEq)]
pub struct ItemCardProps {
    pub item: ClipItem,
    pub position: usize,
    /// Number of items in the list
    pub count: usize,
    pub on_delete: Callback<String>,
    pub on_drag_start: Callback<String>,
    pub on_drop: Callback<String>,
    pub on_drag_end: Callback<()>,
    /// Emits `(from, to)` positions
    pub on_move: Callback<(usize, usize)>,
    #[prop_or(false)]
    pub dragging: bool,
}

#[function_component(ItemCard)]
pub fn item_card(props: &ItemCardProps) -> Html {
    let item = &props.item;

    let ondragstart = {
        let id = item.id.clone();
        props.on_drag_start.reform(move |_: DragEvent| id.clone())
    };

    // Needed so the card accepts drops
    let ondragover = Callback::from(|e: DragEvent| e.prevent_default());

    let ondrop = {
        let id = item.id.clone();
        let on_drop = props.on_drop.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            on_drop.emit(id.clone());
        })
    };

    // Fires after a drop and also when the drag is abandoned
    let ondragend = props.on_drag_end.reform(|_: DragEvent| ());

    let on_delete = {
        let id = item.id.clone();
        props.on_delete.reform(move |_: MouseEvent| id.clone())
    };

    let position = props.position;
    let on_move_up = props.on_move.reform(move |_: MouseEvent| (position, position.saturating_sub(1)));
    let on_move_down = props.on_move.reform(move |_: MouseEvent| (position, position + 1));

    let class = if props.dragging { "clip-card clip-card-dragging" } else { "clip-card" };

    html! {
        <div
            class={class}
            draggable="true"
            {ondragstart}
            {ondragover}
            {ondrop}
            {ondragend}
        >
            <div class="clip-header">
                <span class="clip-position">{props.position + 1}</span>
                <span class={format!("clip-kind clip-kind-{}", item.kind_name())}>{item.kind_name()}</span>
                <Button onclick={on_move_up} disabled={position == 0} variant={ButtonVariant::Secondary} size={ButtonSize::Small}>
                    {"↑"}
                </Button>
                <Button onclick={on_move_down} disabled={position + 1 >= props.count} variant={ButtonVariant::Secondary} size={ButtonSize::Small}>
                    {"↓"}
                </Button>
                <Button onclick={on_delete} variant={ButtonVariant::Danger} size={ButtonSize::Small}>
                    {"✗"}
                </Button>
            </div>
            <div class="clip-body">
                {content_view(item)}
            </div>
            <div class="clip-source" title={item.source_url.clone()}>
                {if item.page_title.is_empty() { &item.source_url } else { &item.page_title }}
            </div>
        </div>
    }
}

fn content_view(item: &ClipItem) -> Html {
    match &item.content {
        ClipKind::Link { url, .. } => html! {
            <a class="clip-link" href={url.clone()} target="_blank" rel="noopener noreferrer">
                {item.label()}
            </a>
        },
        ClipKind::Image { src, alt } => html! {
            <img class="clip-image" src={src.clone()} alt={alt.clone().unwrap_or_default()} />
        },
        ClipKind::Text { text } => html! {
            <blockquote class="clip-text">{text.clone()}</blockquote>
        },
        ClipKind::Screenshot { data_url, width, height } => html! {
            <img
                class="clip-image"
                src={data_url.clone()}
                alt={format!("Screenshot {}×{}", width, height)}
            />
        },
    }
}
