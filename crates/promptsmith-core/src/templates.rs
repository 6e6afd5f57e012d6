//! System prompts, mode checklists and prompt composition.
//!
//! The [`TemplateStore`] is loaded once from a directory containing
//! `system_uz.txt`, `system_ru.txt` and `modes.yaml`, then shared read-only.
//! Composition is deterministic: the same input, mode and `max_bullets`
//! always produce the same prompt.

use std::collections::BTreeMap;
use std::path::Path;

use promptsmith_types::{Lang, Mode};
use serde::Deserialize;
use tracing::debug;

use crate::error::TemplateError;
use crate::lang::detect_lang;

pub const SYSTEM_UZ_FILE: &str = "system_uz.txt";
pub const SYSTEM_RU_FILE: &str = "system_ru.txt";
pub const MODES_FILE: &str = "modes.yaml";

/// Header line above the section checklist.
pub const INSTRUCTION_HEADER: &str = "Bo'limlar / Разделы:";

/// Checklist for one mode, as written in `modes.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModeSpec {
    #[serde(default)]
    pub sections: Vec<String>,
}

/// Mode name to checklist. Unknown keys are kept; lookups fall back to
/// `chatgpt`.
pub type ModesSpec = BTreeMap<String, ModeSpec>;

/// The system prompts the store knows, one per template language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompts {
    pub uz: String,
    pub ru: String,
}

/// A composed prompt plus what was decided while composing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    /// The full text sent to the backend.
    pub text: String,
    /// Language detected in the raw input.
    pub lang: Lang,
    /// Language of the system prompt and worked example actually used.
    pub template_lang: Lang,
}

/// A worked input/output pair shown to the model.
struct WorkedExample {
    input: &'static str,
    output: &'static str,
}

const EXAMPLE_UZ: WorkedExample = WorkedExample {
    input: "rasm chiz: qizil mashina",
    output: "Maqsad: qizil sport avtomobilining realistik 3/4 rakursdagi rasmi.\n\
             Kompozitsiya: bitta avtomobil, fon minimal, yo'l sirtida.\n\
             Mavzu detali: kupe, porloq qizil, qora disklar.\n\
             Uslub & Yoritish: kunduzgi diffuz yorug', yumshoq soyalar.\n\
             Kamera: 35mm, past rakurs.\n\
             Chiqish parametrlari: 1024x1024.\n\
             Nimalar kiritilmasin: odamlar, logotiplar.\n\
             Tekshirish savoli: Fon rangini xohlaysizmi? (oq/ko'k/asfalt)",
};

const EXAMPLE_RU: WorkedExample = WorkedExample {
    input: "сделай промпт для телеграм-бота",
    output: "Цель: готовый промпт для чат-бота в Telegram.\n\
             Роли: бот/пользователь/система.\n\
             Шаги: классификация запроса → ответ → формат Markdown.\n\
             Примеры: приветствие, /help, погода.\n\
             Ограничения: 2000 символов, без ссылок, без ключей.\n\
             Уточняющий вопрос: основной функционал бота?",
};

fn worked_example(lang: Lang) -> &'static WorkedExample {
    match lang {
        Lang::Ru => &EXAMPLE_RU,
        Lang::Uz | Lang::En => &EXAMPLE_UZ,
    }
}

/// Render the section checklist for `mode`.
///
/// Unknown mode names use the `chatgpt` checklist. A map with neither
/// yields the bare header.
pub fn build_instruction(mode: &str, modes: &ModesSpec) -> String {
    let sections = modes
        .get(mode)
        .or_else(|| modes.get(Mode::Chatgpt.as_str()))
        .map(|spec| spec.sections.as_slice())
        .unwrap_or_default();

    let bullets: Vec<String> = sections.iter().map(|s| format!("- {s}")).collect();
    format!("{INSTRUCTION_HEADER}\n{}", bullets.join("\n"))
}

/// Pick the system prompt for `lang`.
///
/// Only Uzbek and Russian prompts exist; every other language gets the
/// Uzbek one. Returns the language actually chosen alongside the text.
pub fn pick_system(lang: Lang, systems: &SystemPrompts) -> (Lang, &str) {
    match lang {
        Lang::Ru => (Lang::Ru, systems.ru.as_str()),
        Lang::Uz | Lang::En => (Lang::Uz, systems.uz.as_str()),
    }
}

/// Loaded templates, immutable after construction.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    systems: SystemPrompts,
    modes: ModesSpec,
}

impl TemplateStore {
    /// Load the store from `dir`.
    ///
    /// # Errors
    ///
    /// Any missing file, malformed YAML, or a missing/empty `chatgpt`
    /// entry.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let uz = read_template(&dir.join(SYSTEM_UZ_FILE))?;
        let ru = read_template(&dir.join(SYSTEM_RU_FILE))?;

        let modes_path = dir.join(MODES_FILE);
        let raw = read_template(&modes_path)?;
        let modes: ModesSpec = serde_yaml::from_str(&raw).map_err(|source| TemplateError::Yaml {
            path: modes_path.clone(),
            source,
        })?;

        let store = Self::from_parts(SystemPrompts { uz, ru }, modes)?;
        debug!(
            dir = %dir.display(),
            modes = store.modes.len(),
            "template store loaded"
        );
        Ok(store)
    }

    /// Build a store from in-memory parts.
    pub fn from_parts(systems: SystemPrompts, modes: ModesSpec) -> Result<Self, TemplateError> {
        let has_chatgpt = modes
            .get(Mode::Chatgpt.as_str())
            .is_some_and(|spec| !spec.sections.is_empty());
        if !has_chatgpt {
            return Err(TemplateError::MissingChatgpt);
        }

        let systems = SystemPrompts {
            uz: systems.uz.trim_end().to_string(),
            ru: systems.ru.trim_end().to_string(),
        };
        Ok(Self { systems, modes })
    }

    pub fn systems(&self) -> &SystemPrompts {
        &self.systems
    }

    pub fn modes(&self) -> &ModesSpec {
        &self.modes
    }

    /// Checklist for `mode`.
    pub fn instruction(&self, mode: Mode) -> String {
        build_instruction(mode.as_str(), &self.modes)
    }

    /// Compose the full generation prompt for `raw`.
    ///
    /// Embeds, in order: the system prompt for the detected language, the
    /// mode checklist, one worked example in the system prompt's language,
    /// the raw input, and a closing task capping the output at
    /// `max_bullets` sections.
    pub fn compose_prompt(&self, raw: &str, mode: Mode, max_bullets: u32) -> ComposedPrompt {
        let lang = detect_lang(raw);
        let (template_lang, system) = pick_system(lang, &self.systems);
        let instruction = self.instruction(mode);
        let example = worked_example(template_lang);

        let text = format!(
            "{system}\n\
             \n\
             === Yo'riqnoma / Инструкция ===\n\
             {instruction}\n\
             \n\
             === Misol / Пример ===\n\
             Kirish / Вход: {ex_in}\n\
             Chiqish / Выход: {ex_out}\n\
             \n\
             === Foydalanuvchi kirishi / Пользовательский ввод ===\n\
             {raw}\n\
             \n\
             === Vazifa / Задача ===\n\
             1) Kirishdan kelib chiqib, tanlangan rejimga mos ravishda to'liq TUZILGAN yakuniy PROMPT yozing.\n\
             2) Tilni saqlang (UZ yoki RU). Max {max_bullets} banddan oshirmang.\n\
             3) Agar kerak bo'lsa, \"Nimalar kiritilmasin / Исключить\" bandini qo'shing.",
            ex_in = example.input,
            ex_out = example.output,
        );

        ComposedPrompt {
            text: text.trim().to_string(),
            lang,
            template_lang,
        }
    }
}

fn read_template(path: &Path) -> Result<String, TemplateError> {
    std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
