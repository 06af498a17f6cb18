// Hiragana Cards – Flashcards for learning hiragana
// Copyright (C) 2023  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use wasm_bindgen::prelude::*;
use web_sys::console;
use super::flashcards;
use flashcards::catalog::Catalog;
use flashcards::hiragana;
use flashcards::logic::{Event, Intent, Logic};
use flashcards::progress::KeyValueStore;
use flashcards::speech::{Silent, Speech, Utterance};
use flashcards::view::{self, CardGrid, CardImage};

const NAV_SCROLL_ID: &str = "navScroll";
const CENTER_ID: &str = "centerHiragana";
const CARDS_CONTAINER_ID: &str = "cardsContainer";
const PROGRESS_FILL_ID: &str = "progressFill";
const MESSAGE_ID: &str = "message";

const SPEAK_BUTTON_TEXT: &str = "🔊";

fn show_error(message: &str) {
    console::log_1(&message.into());

    let Some(window) = web_sys::window()
    else {
        return;
    };

    let Some(document) = window.document()
    else {
        return;
    };

    let Some(message_elem) = document.get_element_by_id(MESSAGE_ID)
    else {
        return;
    };

    message_elem.set_text_content(Some("エラーが発生しました"));
}

fn get_html_element(
    document: &web_sys::Document,
    id: &str,
) -> Result<web_sys::HtmlElement, String> {
    document.get_element_by_id(id)
        .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| format!("failed to get {} element", id))
}

struct Context {
    window: web_sys::Window,
    document: web_sys::Document,
    nav_scroll: web_sys::HtmlElement,
    center: web_sys::HtmlElement,
    cards_container: web_sys::HtmlElement,
    progress_fill: web_sys::HtmlElement,
}

impl Context {
    fn new() -> Result<Context, String> {
        let Some(window) = web_sys::window()
        else {
            return Err("failed to get window".to_string());
        };

        let Some(document) = window.document()
        else {
            return Err("failed to get document".to_string());
        };

        let nav_scroll = get_html_element(&document, NAV_SCROLL_ID)?;
        let center = get_html_element(&document, CENTER_ID)?;
        let cards_container = get_html_element(&document, CARDS_CONTAINER_ID)?;
        let progress_fill = get_html_element(&document, PROGRESS_FILL_ID)?;

        Ok(Context {
            window,
            document,
            nav_scroll,
            center,
            cards_container,
            progress_fill,
        })
    }
}

struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    fn new(window: &web_sys::Window) -> LocalStorage {
        LocalStorage {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let Some(storage) = self.storage.as_ref()
        else {
            return Err("local storage is not available".to_string());
        };

        storage.set_item(key, value)
            .map_err(|_| format!("failed to store “{}”", key))
    }
}

struct SpeechSynthesis {
    synthesis: web_sys::SpeechSynthesis,
}

impl Speech for SpeechSynthesis {
    fn speak(&mut self, utterance: &Utterance) {
        let Ok(web_utterance) =
            web_sys::SpeechSynthesisUtterance::new_with_text(&utterance.text)
        else {
            return;
        };

        web_utterance.set_lang(utterance.lang);
        web_utterance.set_rate(utterance.rate);
        web_utterance.set_pitch(utterance.pitch);

        self.synthesis.cancel();
        self.synthesis.speak(&web_utterance);
    }
}

fn make_speech(window: &web_sys::Window) -> Box<dyn Speech> {
    let available = js_sys::Reflect::has(window, &"speechSynthesis".into())
        .unwrap_or(false);

    if available {
        if let Ok(synthesis) = window.speech_synthesis() {
            return Box::new(SpeechSynthesis { synthesis });
        }
    }

    Box::new(Silent)
}

// Finds the element matching `selector` that contains the target of
// the event
fn event_element(
    event: &web_sys::Event,
    selector: &str,
) -> Option<web_sys::Element> {
    event.target()?
        .dyn_into::<web_sys::Element>().ok()?
        .closest(selector).ok()?
}

type EventClosure = Closure::<dyn Fn(JsValue)>;

struct HiraganaCards {
    context: Context,
    logic: Logic<LocalStorage>,
    speech: Box<dyn Speech>,

    nav_click_closure: Option<EventClosure>,
    card_click_closure: Option<EventClosure>,
}

impl HiraganaCards {
    fn new(
        context: Context,
        logic: Logic<LocalStorage>,
        speech: Box<dyn Speech>,
    ) -> Box<HiraganaCards> {
        let mut app = Box::new(HiraganaCards {
            context,
            logic,
            speech,
            nav_click_closure: None,
            card_click_closure: None,
        });

        let app_pointer = app.as_mut() as *mut HiraganaCards;

        // The click handlers are attached to the containers rather
        // than to each button so that they survive re-rendering
        let nav_click_closure = EventClosure::new(move |event: JsValue| {
            let app = unsafe { &mut *app_pointer };
            if let Ok(event) = event.dyn_into::<web_sys::Event>() {
                app.handle_nav_click(&event);
            }
        });

        let _ = app.context.nav_scroll.add_event_listener_with_callback(
            "click",
            nav_click_closure.as_ref().unchecked_ref(),
        );

        app.nav_click_closure = Some(nav_click_closure);

        let card_click_closure = EventClosure::new(move |event: JsValue| {
            let app = unsafe { &mut *app_pointer };
            if let Ok(event) = event.dyn_into::<web_sys::Event>() {
                app.handle_card_click(&event);
            }
        });

        let _ = app.context.cards_container.add_event_listener_with_callback(
            "click",
            card_click_closure.as_ref().unchecked_ref(),
        );

        app.card_click_closure = Some(card_click_closure);

        app.logic.start();
        app.flush_logic_events();

        app
    }

    fn dispatch(&mut self, intent: Intent) {
        self.logic.dispatch(intent);
        self.flush_logic_events();
    }

    fn handle_nav_click(&mut self, event: &web_sys::Event) {
        let Some(button) = event_element(event, ".nav-btn")
        else {
            return;
        };

        if button.class_list().contains("disabled") {
            return;
        }

        let Some(ch) = button.text_content()
            .and_then(|text| hiragana::single_char(&text))
        else {
            return;
        };

        self.dispatch(Intent::SelectCharacter(ch));
    }

    fn handle_card_click(&mut self, event: &web_sys::Event) {
        // The speak button must not also toggle the card it is on
        if let Some(button) = event_element(event, ".speak-btn") {
            event.stop_propagation();

            if let Some(reading) = button.get_attribute("data-reading") {
                self.dispatch(Intent::Speak(reading));
            }

            return;
        }

        let Some(index) = event_element(event, ".card")
            .and_then(|card| card.get_attribute("data-index"))
            .and_then(|index| index.parse::<usize>().ok())
        else {
            return;
        };

        self.dispatch(Intent::ToggleCard(index));
    }

    fn flush_logic_events(&mut self) {
        let mut navigation_changed = false;
        let mut cards_changed = false;
        let mut progress_changed = false;

        while let Some(event) = self.logic.get_event() {
            match event {
                Event::NavigationChanged => navigation_changed = true,
                Event::CardsChanged => cards_changed = true,
                Event::ProgressChanged => progress_changed = true,
                Event::CardToggled(index) => {
                    if self.update_card_label(index).is_err() {
                        console::log_1(&"Error updating card label".into());
                    }
                },
                Event::Speak(utterance) => self.speech.speak(&utterance),
                Event::StorageFailed(e) => {
                    console::log_1(
                        &format!("Error saving progress: {}", e).into()
                    );
                },
            }
        }

        if navigation_changed && self.render_navigation().is_err() {
            console::log_1(&"Error rendering navigation".into());
        }

        if cards_changed && self.render_cards().is_err() {
            console::log_1(&"Error rendering cards".into());
        }

        if progress_changed && self.update_progress().is_err() {
            console::log_1(&"Error updating progress".into());
        }
    }

    fn render_navigation(&self) -> Result<(), JsValue> {
        let document = &self.context.document;
        let nav_scroll = &self.context.nav_scroll;

        nav_scroll.set_text_content(None);

        let mut active_button = None;

        for button in view::navigation(&self.logic) {
            let elem = document.create_element("button")?;
            let class_list = elem.class_list();

            class_list.add_1("nav-btn")?;
            elem.set_text_content(Some(&button.symbol.to_string()));

            if button.disabled {
                class_list.add_1("disabled")?;
                elem.set_attribute("disabled", "")?;
            }

            if button.learned {
                class_list.add_1("learned")?;
            }

            if button.active {
                class_list.add_1("active")?;
            }

            nav_scroll.append_child(&elem)?;

            if button.active {
                active_button = Some(elem);
            }
        }

        if let Some(active_button) = active_button {
            let mut options = web_sys::ScrollIntoViewOptions::new();
            options
                .behavior(web_sys::ScrollBehavior::Smooth)
                .block(web_sys::ScrollLogicalPosition::Nearest)
                .inline(web_sys::ScrollLogicalPosition::Center);
            active_button.scroll_into_view_with_scroll_into_view_options(
                &options
            );
        }

        Ok(())
    }

    fn render_cards(&self) -> Result<(), JsValue> {
        let document = &self.context.document;
        let container = &self.context.cards_container;

        let displayed = self.logic.displayed().map(|ch| ch.to_string());
        self.context.center.set_text_content(displayed.as_deref());

        container.set_text_content(None);

        let cards = match view::card_grid(&self.logic) {
            CardGrid::NoData => {
                let message = document.create_element("p")?;
                message.set_class_name("no-data");
                message.set_text_content(Some(view::NO_DATA_MESSAGE));
                container.append_child(&message)?;
                return Ok(());
            },
            CardGrid::Cards(cards) => cards,
        };

        for card in cards {
            let card_elem = document.create_element("div")?;
            card_elem.set_class_name("card");
            card_elem.set_attribute("data-index", &card.index.to_string())?;

            match card.image {
                CardImage::Image { src, alt } => {
                    let image = document.create_element("img")?
                        .dyn_into::<web_sys::HtmlImageElement>()?;
                    image.set_class_name("card-image");
                    image.set_src(src);
                    image.set_alt(alt);
                    image.set_attribute("loading", "lazy")?;
                    card_elem.append_child(&image)?;
                },
                CardImage::Glyph(glyph) => {
                    let glyph_elem = document.create_element("span")?;
                    glyph_elem.set_class_name("placeholder-emoji");
                    glyph_elem.set_text_content(Some(glyph));
                    card_elem.append_child(&glyph_elem)?;
                },
            }

            let label = document.create_element("div")?;
            label.set_class_name("card-label");
            if card.shown {
                label.class_list().add_1("show")?;
            }
            let reading = document.create_element("span")?;
            reading.set_text_content(Some(card.reading));
            label.append_child(&reading)?;
            card_elem.append_child(&label)?;

            let speak_button = document.create_element("button")?;
            speak_button.set_class_name("speak-btn");
            speak_button.set_text_content(Some(SPEAK_BUTTON_TEXT));
            speak_button.set_attribute("data-reading", card.reading)?;
            card_elem.append_child(&speak_button)?;

            container.append_child(&card_elem)?;
        }

        Ok(())
    }

    fn update_card_label(&self, index: usize) -> Result<(), JsValue> {
        let Some(card) = self.logic.card(index)
        else {
            return Ok(());
        };

        let selector = format!(
            ".card[data-index=\"{}\"] .card-label",
            index,
        );

        if let Some(label) =
            self.context.cards_container.query_selector(&selector)?
        {
            label.class_list().toggle_with_force("show", card.shown)?;
        }

        Ok(())
    }

    fn update_progress(&self) -> Result<(), JsValue> {
        self.context.progress_fill.style().set_property(
            "width",
            &view::progress_width(&self.logic),
        )
    }
}

#[wasm_bindgen]
pub fn init_hiragana() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let context = match Context::new() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    let catalog = match Catalog::builtin() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e.to_string());
            return;
        }
    };

    let storage = LocalStorage::new(&context.window);

    let logic = match Logic::new(catalog, storage) {
        Ok(l) => l,
        Err(e) => {
            show_error(&e.to_string());
            return;
        }
    };

    let speech = make_speech(&context.window);

    let app = HiraganaCards::new(context, logic, speech);

    // Leak the app so that it will live as long as the web page
    std::mem::forget(app);
}
