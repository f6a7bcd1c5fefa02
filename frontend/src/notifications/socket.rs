use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::{NotificationError, Socket, SocketConnector, SocketEvents};

fn js_error(err: JsValue) -> NotificationError {
    NotificationError::Socket(format!("{:?}", err))
}

/// Opens sockets with the browser's `WebSocket`.
pub struct WebSocketConnector;

impl SocketConnector for WebSocketConnector {
    fn connect(
        &self,
        url: &str,
        events: SocketEvents,
    ) -> Result<Box<dyn Socket>, NotificationError> {
        let ws = WebSocket::new(url).map_err(js_error)?;

        let on_open = {
            let callback = events.on_open.clone();
            Closure::wrap(Box::new(move |_: Event| callback()) as Box<dyn FnMut(Event)>)
        };
        let on_message = {
            let callback = events.on_message.clone();
            Closure::wrap(Box::new(move |ev: MessageEvent| {
                if let Some(text) = ev.data().as_string() {
                    callback(text);
                }
            }) as Box<dyn FnMut(MessageEvent)>)
        };
        let on_close = {
            let callback = events.on_close.clone();
            Closure::wrap(Box::new(move |_: CloseEvent| callback()) as Box<dyn FnMut(CloseEvent)>)
        };
        let on_error = {
            let callback = events.on_error.clone();
            Closure::wrap(Box::new(move |ev: Event| {
                callback(format!("{} on websocket", ev.type_()))
            }) as Box<dyn FnMut(Event)>)
        };

        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Box::new(BrowserSocket {
            ws,
            _on_open: on_open,
            _on_message: on_message,
            _on_close: on_close,
            _on_error: on_error,
        }))
    }
}

struct BrowserSocket {
    ws: WebSocket,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl BrowserSocket {
    fn detach(&self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
    }
}

impl Socket for BrowserSocket {
    fn send(&self, text: &str) -> Result<(), NotificationError> {
        self.ws.send_with_str(text).map_err(js_error)
    }

    fn close(&self) {
        self.detach();
        if let Err(err) = self.ws.close() {
            log::warn!("failed to close websocket: {:?}", err);
        }
    }
}

impl Drop for BrowserSocket {
    fn drop(&mut self) {
        self.detach();
    }
}
