//! Email bodies sent by the checkout flows.

/// Subject of the diagnostic message.
pub const TEST_SUBJECT: &str = "Тест: письмо Planer ✅";

/// Rendered message: subject plus HTML and plain-text alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl EmailContent {
    /// Message delivering the purchased link.
    pub fn fulfillment(subject: impl Into<String>, link: &str) -> Self {
        let escaped = escape_html(link);
        let html_body = format!(
            r#"<div style="font-family:Arial, sans-serif; font-size:16px; line-height:1.55;">
  <p><b>Доброго времени суток! Забирайте Planer:</b></p>
  <p style="margin:10px 0;">
    <a href="{escaped}" style="color:#0b57d0; text-decoration:underline;">{escaped}</a>
  </p>
  <p><b>Сохраните и сделайте доступ удобным:</b></p>
  <ul style="margin:8px 0 14px; padding-left:18px;">
    <li>добавьте на экран «Домой» на телефоне</li>
    <li>закрепите вкладку в браузере</li>
  </ul>
  <p>Желаем Вам успехов на пути к мечте! Спасибо, что выбрали нас 💖</p>
</div>"#
        );
        let text_body = format!(
            "Доброго времени суток! Забирайте Planer:\n{link}\n\n\
             Сохраните и сделайте доступ удобным:\n\
             - добавьте на экран «Домой» на телефоне\n\
             - закрепите вкладку в браузере\n\n\
             Желаем Вам успехов на пути к мечте! Спасибо, что выбрали нас 💖\n"
        );

        Self {
            subject: subject.into(),
            html_body,
            text_body,
        }
    }

    /// Diagnostic message used to check the SMTP setup.
    pub fn test_message(link: Option<&str>) -> Self {
        let (link_html, link_text) = match link {
            Some(link) => {
                let escaped = escape_html(link);
                (
                    format!(r#"<a href="{escaped}" target="_blank">{escaped}</a>"#),
                    link.to_string(),
                )
            }
            None => (
                "(ссылка не настроена)".to_string(),
                "(ссылка не настроена)".to_string(),
            ),
        };

        let html_body = format!(
            r#"<div style="font-family: Arial, sans-serif; line-height: 1.6;">
  <h2>Проверка отправки писем</h2>
  <p>Это тестовое письмо от Planer.</p>
  <p><b>Ваша ссылка на Planer:</b></p>
  <p>{link_html}</p>
  <p>Спасибо 💖</p>
</div>"#
        );
        let text_body = format!(
            "Проверка отправки писем\n\nЭто тестовое письмо от Planer.\n\
             Ваша ссылка на Planer: {link_text}\n\nСпасибо 💖\n"
        );

        Self {
            subject: TEST_SUBJECT.to_string(),
            html_body,
            text_body,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
