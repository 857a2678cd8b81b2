use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::actions::{BUTTON_BACK_TO_MAIN, BUTTON_REFILL, BUTTON_SUBMIT, BUTTON_WITHDRAWAL};

/// Главное меню: выбор типа операции.
pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(BUTTON_REFILL, BUTTON_REFILL),
        InlineKeyboardButton::callback(BUTTON_WITHDRAWAL, BUTTON_WITHDRAWAL),
    ]])
}

pub fn back_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "назад",
        BUTTON_BACK_TO_MAIN,
    )]])
}

/// По одной категории в строке; текст кнопки совпадает с её идентификатором.
pub fn categories_keyboard(categories: &[String]) -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = categories
        .iter()
        .map(|category| vec![InlineKeyboardButton::callback(category.clone(), category.clone())])
        .collect();

    keyboard.push(vec![InlineKeyboardButton::callback("назад", BUTTON_BACK_TO_MAIN)]);

    InlineKeyboardMarkup::new(keyboard)
}

pub fn comment_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(BUTTON_SUBMIT, BUTTON_SUBMIT),
        InlineKeyboardButton::callback(BUTTON_BACK_TO_MAIN, BUTTON_BACK_TO_MAIN),
    ]])
}

pub fn link_keyboard(title: &str, url: reqwest::Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(title.to_string(), url)]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_ids(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn main_menu_offers_both_operations() {
        assert_eq!(
            callback_ids(&main_menu_keyboard()),
            vec![BUTTON_REFILL.to_string(), BUTTON_WITHDRAWAL.to_string()]
        );
    }

    #[test]
    fn categories_keyboard_has_one_row_per_category_plus_back() {
        let categories = vec!["продукты".to_string(), "кафе".to_string()];
        let keyboard = categories_keyboard(&categories);
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        assert_eq!(
            callback_ids(&keyboard),
            vec!["продукты", "кафе", BUTTON_BACK_TO_MAIN]
        );
    }
}
