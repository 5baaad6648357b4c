//! Fixed user-facing texts (Uzbek) and reply composition.
//!
//! Replies are sent with HTML parse mode, so anything that did not originate
//! here goes through [`escape_html`].

pub const GREETING: &str = "Assalomu alaykum! Tarjima uchun matnli yoki ovozli xabar yuboring.";

pub const SELECT_DIRECTION_FOR_VOICE: &str =
    "Iltimos, avval ovozli xabar qaysi tilga tarjima qilinishi uchun yo'nalishni tanlang.";

pub const SELECT_DIRECTION_FOR_TEXT: &str =
    "Iltimos, avval matn qaysi tilga tarjima qilinishi uchun yo'nalishni tanlang.";

pub const VOICE_ACCEPTED: &str = "Ovozli xabar qabul qilindi, qayta ishlanmoqda...";

pub const ACQUISITION_FAILED: &str =
    "Kechirasiz, ovozli xabarni yuklab olishda xatolik yuz berdi. Iltimos, qayta yuboring.";

pub const CONVERSION_FAILED: &str =
    "Kechirasiz, audio faylni qayta ishlashda xatolik yuz berdi. FFmpeg o'rnatilganini tekshiring.";

pub const SPEECH_UNINTELLIGIBLE: &str = "Kechirasiz, nutqni aniqlab bo'lmadi.";

pub const TRANSLATION_UNAVAILABLE: &str = "😔 Kechirasiz, tarjima qilishda xatolik yuz berdi.";

/// Longest service detail echoed back to a user.
const MAX_DETAIL_CHARS: usize = 200;

/// Longest untrusted body embedded in a reply. Telegram rejects messages over
/// 4096 characters after entity parsing; the rest is left for the header.
pub const MAX_BODY_CHARS: usize = 4000;

/// Cuts `text` to at most `max` characters, marking the cut with an ellipsis.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn direction_selected(label: &str) -> String {
    format!(
        "Yo'nalish tanlandi: {}\nEndi matnli yoki ovozli xabar yuboring.",
        escape_html(label)
    )
}

/// Intermediate acknowledgment sent before translation starts.
pub fn recognized_text(text: &str) -> String {
    format!(
        "<b>Aniqlangan matn:</b>\n\n<i>{}</i>\n\nTarjima qilinmoqda...",
        escape_html(&clip(text, MAX_BODY_CHARS))
    )
}

pub fn recognition_failed(detail: &str) -> String {
    let detail: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
    format!(
        "Nutqni aniqlash xizmatida xatolik yuz berdi: {}",
        escape_html(&detail)
    )
}

pub fn translation(provider: &str, text: &str) -> String {
    format!(
        "<b>Tarjima ({}):</b>\n\n{}",
        escape_html(provider),
        escape_html(&clip(text, MAX_BODY_CHARS))
    )
}
