// The prelude brings all the essential Dioxus items into scope.
use dioxus::prelude::*;
use futures_util::{SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message as GlooWsMessage};
use surface::Surface;
use whiteboard_canvas::{Brush, Point, PointerTracker, Segment, WsMessage, EXPORT_FILE_NAME};

mod surface;

// Ensure this matches the relay's address.
const WS_URL: &str = "ws://localhost:3000/ws";
const CANVAS_ID: &str = "whiteboard-canvas";

/// The main application component.
#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        main {
            class: "",
            Whiteboard {}
        }
    }
}

fn element_point(evt: &MouseEvent) -> Point {
    let p = evt.element_coordinates();
    Point::new(p.x, p.y)
}

/// Draws a locally produced segment, then hands it to the socket.
fn emit(mut surface: Signal<Option<Surface>>, ws: Coroutine<Segment>, segment: Segment) {
    if let Some(surface) = surface.write().as_mut() {
        surface.draw(&segment);
    }
    ws.send(segment);
}

#[allow(non_snake_case)]
fn Whiteboard() -> Element {
    let mut brush = use_signal(Brush::default);
    let mut tracker = use_signal(PointerTracker::new);
    let mut surface = use_signal::<Option<Surface>>(|| None);

    let ws_coroutine = use_coroutine(move |mut rx: UnboundedReceiver<Segment>| async move {
        let ws = match WebSocket::open(WS_URL) {
            Ok(ws) => ws,
            Err(e) => {
                log::error!("Failed to connect to WebSocket: {:?}", e);
                return;
            }
        };

        let (mut write, mut read) = ws.split();

        // Incoming segments from peers
        spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(GlooWsMessage::Text(text)) => match WsMessage::from_json(&text) {
                        Ok(WsMessage::Draw(segment)) => {
                            if let Some(surface) = surface.write().as_mut() {
                                surface.draw(&segment);
                            }
                        }
                        Err(e) => log::warn!("Ignoring malformed message: {}", e),
                    },
                    Ok(GlooWsMessage::Bytes(_)) => {}
                    Err(e) => {
                        log::error!("WebSocket connection closed: {:?}", e);
                        break;
                    }
                }
            }
        });

        // Outgoing segments
        while let Some(segment) = rx.next().await {
            let json_msg = match WsMessage::Draw(segment).to_json() {
                Ok(json) => json,
                Err(e) => {
                    log::error!("Failed to encode segment: {}", e);
                    continue;
                }
            };
            if write.send(GlooWsMessage::Text(json_msg)).await.is_err() {
                log::error!("WebSocket connection closed. Cannot send message.");
                break;
            }
        }
    });

    rsx! {
        nav {
            class: "bg-gray-800 p-4 flex items-center justify-between",
            div { class: "text-white text-lg font-bold", "White Space" }
            div {
                class: "flex items-center space-x-4",
                label { class: "text-white", "Brush Color:" }
                input {
                    r#type: "color",
                    value: "{brush.read().color}",
                    class: "border-none w-10 cursor-pointer",
                    oninput: move |evt| brush.write().set_color(evt.value()),
                }
                label { class: "text-white", "Brush Size:" }
                input {
                    r#type: "range",
                    min: "1",
                    max: "10",
                    value: "{brush.read().size}",
                    class: "w-24",
                    oninput: move |evt| {
                        if let Ok(size) = evt.value().parse::<f64>() {
                            brush.write().set_size(size);
                        }
                    },
                }
                button {
                    class: "bg-red-500 hover:bg-red-700 text-white font-bold py-2 px-4 rounded",
                    onclick: move |_| {
                        if let Some(surface) = surface.write().as_mut() {
                            surface.clear();
                        }
                    },
                    "Clear"
                }
                button {
                    class: "bg-green-500 hover:bg-green-700 text-white font-bold py-2 px-4 rounded",
                    onclick: move |_| {
                        if let Some(surface) = surface.read().as_ref() {
                            surface.save(EXPORT_FILE_NAME);
                        }
                    },
                    "Save"
                }
            }
        }

        div {
            class: "m-4",
            canvas {
                id: CANVAS_ID,
                class: "border-2 border-gray-500 w-full h-96 bg-gray-200",
                prevent_default: "onmousedown onmousemove",

                onmounted: move |_| match Surface::attach(CANVAS_ID) {
                    Some(attached) => surface.set(Some(attached)),
                    None => log::error!("Could not attach to the canvas element."),
                },

                onmousedown: move |evt| {
                    let segment = tracker.write().press(element_point(&evt), &brush.read());
                    emit(surface, ws_coroutine, segment);
                },

                onmousemove: move |evt| {
                    let segment = tracker.write().move_to(element_point(&evt), &brush.read());
                    if let Some(segment) = segment {
                        emit(surface, ws_coroutine, segment);
                    }
                },

                onmouseup: move |_| tracker.write().release(),
                onmouseleave: move |_| tracker.write().release(),
            }
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    launch(App);
}
