use wasm_bindgen::prelude::*;

pub mod config;
pub mod content;
pub mod error;
pub mod i18n;
pub mod library;
pub mod preferences;
pub mod storage;
pub mod training;
pub mod video;

use content::ContentModel;
use i18n::{Params, Translations};
use library::{Library, TypeFilter};
use preferences::Preferences;
use serde::Serialize;
use storage::KeyValueStore;
use training::{ExerciseStep, StepPhase, TrainingEngine, TrainingView};

use std::cell::RefCell;
use std::rc::Rc;

struct TrainingUi {
    engine: TrainingEngine,
    step: ExerciseStep,
    /// Picked once per run so the completion screen does not flicker.
    message: String,
}

impl TrainingUi {
    fn new(content: Rc<ContentModel>) -> Self {
        let message = content.pick_message(&mut rand::thread_rng()).to_string();
        let engine = TrainingEngine::new(content, tab_store());
        let step = ExerciseStep::current(&engine);
        TrainingUi { engine, step, message }
    }

    fn sync_step(&mut self) {
        self.step = ExerciseStep::current(&self.engine);
    }
}

#[derive(Serialize)]
struct TrainingScreen<'a> {
    #[serde(flatten)]
    view: TrainingView<'a>,
    step: &'a StepPhase,
}

thread_local! {
    static CONTENT: RefCell<Option<Rc<ContentModel>>> = RefCell::new(None);
    static TRAINING: RefCell<Option<TrainingUi>> = RefCell::new(None);
    static LIBRARY: RefCell<Option<Library>> = RefCell::new(None);
    static PREFERENCES: RefCell<Option<Preferences>> = RefCell::new(None);
    static TRANSLATIONS: RefCell<Option<Rc<Translations>>> = RefCell::new(None);
}

#[cfg(target_arch = "wasm32")]
fn tab_store() -> Box<dyn KeyValueStore> {
    storage::session_store()
}

#[cfg(not(target_arch = "wasm32"))]
fn tab_store() -> Box<dyn KeyValueStore> {
    Box::new(storage::MemoryStore::new())
}

#[cfg(target_arch = "wasm32")]
fn profile_store() -> Box<dyn KeyValueStore> {
    storage::local_store()
}

#[cfg(not(target_arch = "wasm32"))]
fn profile_store() -> Box<dyn KeyValueStore> {
    Box::new(storage::MemoryStore::new())
}

fn js_error(msg: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&msg.to_string()).into()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

fn content() -> Result<Rc<ContentModel>, JsValue> {
    CONTENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        if let Some(content) = slot.as_ref() {
            return Ok(content.clone());
        }
        let loaded = Rc::new(ContentModel::bundled().map_err(js_error)?);
        *slot = Some(loaded.clone());
        Ok(loaded)
    })
}

fn translations() -> Result<Rc<Translations>, JsValue> {
    TRANSLATIONS.with(|cell| {
        let mut slot = cell.borrow_mut();
        if let Some(tables) = slot.as_ref() {
            return Ok(tables.clone());
        }
        let loaded = Rc::new(Translations::bundled().map_err(js_error)?);
        *slot = Some(loaded.clone());
        Ok(loaded)
    })
}

fn with_training<T>(f: impl FnOnce(&mut TrainingUi) -> Result<T, JsValue>) -> Result<T, JsValue> {
    TRAINING.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(TrainingUi::new(content()?));
        }
        let ui = slot.as_mut().ok_or_else(|| js_error("training is not initialised"))?;
        f(ui)
    })
}

fn with_library<T>(f: impl FnOnce(&mut Library) -> Result<T, JsValue>) -> Result<T, JsValue> {
    LIBRARY.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(Library::new(content()?));
        }
        let library = slot.as_mut().ok_or_else(|| js_error("library is not initialised"))?;
        f(library)
    })
}

fn with_preferences<T>(f: impl FnOnce(&mut Preferences) -> T) -> T {
    PREFERENCES.with(|cell| {
        let mut slot = cell.borrow_mut();
        let prefs = slot.get_or_insert_with(|| Preferences::load(profile_store()));
        f(prefs)
    })
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

// Training

/// The current training screen: `noExercises`, `exercise` or `completed`,
/// plus whether the step is picking or reviewing a lesson.
#[wasm_bindgen]
pub fn training_view() -> Result<JsValue, JsValue> {
    with_training(|ui| {
        let screen = TrainingScreen {
            view: ui.engine.view(&ui.message),
            step: ui.step.phase(),
        };
        to_js(&screen)
    })
}

#[wasm_bindgen]
pub fn training_choose(lesson_id: &str) -> Result<(), JsValue> {
    with_training(|ui| {
        ui.step.choose(lesson_id);
        Ok(())
    })
}

/// Pick a lesson for the user. Returns its id, or `null` if there is none.
#[wasm_bindgen]
pub fn training_pick_random() -> Result<Option<String>, JsValue> {
    with_training(|ui| {
        let TrainingUi { engine, step, .. } = ui;
        Ok(step.choose_random(engine, &mut rand::thread_rng()))
    })
}

#[wasm_bindgen]
pub fn training_change_lesson() -> Result<(), JsValue> {
    with_training(|ui| {
        ui.step.change_lesson();
        Ok(())
    })
}

/// "Done" on the review screen. Safe to call twice.
#[wasm_bindgen]
pub fn training_confirm() -> Result<JsValue, JsValue> {
    with_training(|ui| {
        let transition = ui.step.confirm(&mut ui.engine);
        to_js(&transition)
    })
}

#[wasm_bindgen]
pub fn training_go_back() -> Result<JsValue, JsValue> {
    with_training(|ui| {
        let transition = ui.engine.go_back();
        ui.sync_step();
        to_js(&transition)
    })
}

#[wasm_bindgen]
pub fn training_reset() -> Result<(), JsValue> {
    with_training(|ui| {
        ui.engine.reset();
        ui.sync_step();
        ui.message = ui.engine.content().pick_message(&mut rand::thread_rng()).to_string();
        Ok(())
    })
}

// Library

#[wasm_bindgen]
pub fn library_set_query(query: &str) -> Result<(), JsValue> {
    with_library(|library| {
        library.set_query(query);
        Ok(())
    })
}

/// `"all"`, `"song"`, `"drum-beat"` or `"fundamental"`.
#[wasm_bindgen]
pub fn library_set_filter(filter: &str) -> Result<(), JsValue> {
    let filter = TypeFilter::parse(filter).ok_or_else(|| js_error(format!("Unknown filter: {}", filter)))?;
    with_library(|library| {
        library.set_filter(filter);
        Ok(())
    })
}

/// Override search settings; omitted fields keep their defaults.
#[wasm_bindgen]
pub fn library_configure(config_js: JsValue) -> Result<(), JsValue> {
    let config: config::SearchConfig = serde_wasm_bindgen::from_value(config_js).map_err(js_error)?;
    with_library(|library| {
        let mut replacement = Library::with_config(content()?, config);
        replacement.set_query(library.query());
        replacement.set_filter(library.filter());
        *library = replacement;
        Ok(())
    })
}

#[wasm_bindgen]
pub fn library_filter_tabs() -> Result<JsValue, JsValue> {
    with_library(|library| to_js(&library.filter_tabs()))
}

#[wasm_bindgen]
pub fn library_view() -> Result<JsValue, JsValue> {
    with_library(|library| to_js(&library.view()))
}

/// A lesson with its embeddable video URL, or `null` for an unknown id.
#[wasm_bindgen]
pub fn lesson_detail(lesson_id: &str) -> Result<JsValue, JsValue> {
    let content = content()?;
    match content.lesson(lesson_id) {
        Some(lesson) => to_js(&video::LessonDetail::new(lesson)),
        None => Ok(JsValue::NULL),
    }
}

// Preferences

#[wasm_bindgen]
pub fn theme() -> String {
    with_preferences(|p| p.theme().as_str().to_string())
}

#[wasm_bindgen]
pub fn cycle_theme() -> String {
    with_preferences(|p| p.cycle_theme().as_str().to_string())
}

#[wasm_bindgen]
pub fn language() -> String {
    with_preferences(|p| p.language().as_str().to_string())
}

#[wasm_bindgen]
pub fn cycle_language() -> String {
    with_preferences(|p| p.cycle_language().as_str().to_string())
}

/// `"ltr"` or `"rtl"` for the current language.
#[wasm_bindgen]
pub fn text_direction() -> Result<JsValue, JsValue> {
    with_preferences(|p| to_js(&p.language().direction()))
}

/// A UI string in the current language. `params` is an optional object of
/// `{{name}}` values; a numeric `count` selects the plural form.
#[wasm_bindgen]
pub fn translate(key: &str, params: JsValue) -> Result<String, JsValue> {
    let params: Params = if params.is_undefined() || params.is_null() {
        Params::new()
    } else {
        serde_wasm_bindgen::from_value(params).map_err(js_error)?
    };
    let tables = translations()?;
    let language = with_preferences(|p| p.language());
    Ok(tables.translate(language, key, &params))
}

/// Check content text the way the build does.
#[wasm_bindgen]
pub fn validate_content(lessons_yaml: &str, training_yaml: &str) -> Result<JsValue, JsValue> {
    to_js(&content::validate::validate_content(lessons_yaml, training_yaml))
}
