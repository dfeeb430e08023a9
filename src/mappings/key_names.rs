use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Преобразование имён клавиш из конфигурации горячих клавиш в коды evdev
pub struct KeyNames;

// Статическая таблица клавиш, допустимых в горячих клавишах
static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    for (name, code) in [
        ("a", 30), ("b", 48), ("c", 46), ("d", 32), ("e", 18), ("f", 33), ("g", 34),
        ("h", 35), ("i", 23), ("j", 36), ("k", 37), ("l", 38), ("m", 50), ("n", 49),
        ("o", 24), ("p", 25), ("q", 16), ("r", 19), ("s", 31), ("t", 20), ("u", 22),
        ("v", 47), ("w", 17), ("x", 45), ("y", 21), ("z", 44),
    ] {
        map.insert(name, code);
    }

    // Цифровые клавиши (верхний ряд)
    for (name, code) in [
        ("1", 2), ("2", 3), ("3", 4), ("4", 5), ("5", 6),
        ("6", 7), ("7", 8), ("8", 9), ("9", 10), ("0", 11),
    ] {
        map.insert(name, code);
    }

    // Функциональные клавиши
    for (name, code) in [
        ("f1", 59), ("f2", 60), ("f3", 61), ("f4", 62), ("f5", 63), ("f6", 64),
        ("f7", 65), ("f8", 66), ("f9", 67), ("f10", 68), ("f11", 87), ("f12", 88),
    ] {
        map.insert(name, code);
    }

    // Специальные клавиши
    for (name, code) in [
        ("esc", 1), ("minus", 12), ("equal", 13), ("backspace", 14), ("tab", 15),
        ("enter", 28), ("space", 57), ("comma", 51), ("dot", 52), ("slash", 53),
        ("semicolon", 39), ("apostrophe", 40), ("grave", 41), ("backslash", 43),
        ("leftbrace", 26), ("rightbrace", 27),
    ] {
        map.insert(name, code);
    }

    // Навигация
    for (name, code) in [
        ("home", 102), ("up", 103), ("pageup", 104), ("left", 105), ("right", 106),
        ("end", 107), ("down", 108), ("pagedown", 109), ("insert", 110), ("delete", 111),
        ("printscreen", 99), ("pause", 119),
    ] {
        map.insert(name, code);
    }

    map
});

static CODE_TO_KEY_NAME: Lazy<HashMap<u16, &'static str>> =
    Lazy::new(|| KEY_NAME_TO_CODE.iter().map(|(name, code)| (*code, *name)).collect());

// Синонимы, которые пользователи часто пишут в конфигурации
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("escape", "esc"),
        ("return", "enter"),
        ("del", "delete"),
        ("ins", "insert"),
        ("pgup", "pageup"),
        ("pgdn", "pagedown"),
    ])
});

impl KeyNames {
    /// Получить evdev код клавиши по её имени (регистронезависимо)
    pub fn translate(key_name: &str) -> Option<u16> {
        let normalized = key_name.trim().to_lowercase();
        let canonical = ALIASES.get(normalized.as_str()).copied().unwrap_or(normalized.as_str());
        KEY_NAME_TO_CODE.get(canonical).copied()
    }

    /// Обратное преобразование для логов и вывода конфигурации
    pub fn reverse_translate(keycode: u16) -> Option<&'static str> {
        CODE_TO_KEY_NAME.get(&keycode).copied()
    }
}
