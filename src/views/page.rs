use crate::config::settings::Settings;
use crate::models::donation::AmountSelector;
use crate::models::payment::PaymentArtifact;
use crate::services::checkout::CheckoutState;
use crate::utils::helpers::{escape_html, format_brl};
use rust_decimal::Decimal;

pub const PAY_LINK_LABEL: &str = "Ir para Pagamento Seguro";
pub const DONATE_LABEL: &str = "Doar Agora";
pub const PIX_LABEL: &str = "Doar com PIX";
pub const CUSTOM_PLACEHOLDER: &str = "Outro valor";
pub const CONTACT_INVITE: &str =
    "Entre em contato pelos links abaixo! Estou à disposição para tirar qualquer dúvida.";

const STYLE: &str = r#"
body{margin:0;font-family:system-ui,sans-serif;background:#f9fafb;color:#111827}
main,section{max-width:960px;margin:0 auto;padding:48px 16px}
h1{font-size:2.75rem;line-height:1.1}h1 span{color:#3b82f6}
.story{font-size:1.125rem;color:#4b5563}
#doar{background:#fff;text-align:center}
.presets{display:grid;grid-template-columns:repeat(4,1fr);gap:16px;margin:32px 0}
.preset{display:block;padding:16px;border-radius:12px;border:2px solid #e5e7eb;font-weight:700;color:#374151;text-decoration:none}
.preset.selected{background:#2563eb;border-color:#2563eb;color:#fff}
input{padding:12px;border-radius:8px;border:1px solid #d1d5db;font-size:1rem}
button{padding:14px 28px;border:0;border-radius:999px;background:#f97316;color:#fff;font-weight:700;font-size:1.1rem;cursor:pointer}
button:disabled{background:#9ca3af;cursor:not-allowed}
.prompt{color:#b91c1c;font-weight:600}
.modal{position:fixed;inset:0;background:rgba(0,0,0,.7);display:flex;align-items:center;justify-content:center;padding:16px}
.modal-card{background:#fff;border-radius:16px;max-width:440px;width:100%;padding:32px;text-align:center;position:relative}
.modal-close{position:absolute;top:16px;right:16px;color:#9ca3af;text-decoration:none}
.pay-link{display:inline-block;margin-top:16px;padding:14px 28px;border-radius:999px;background:#009ee3;color:#fff;font-weight:700;text-decoration:none}
.pix-code{width:100%;font-family:monospace;background:#f3f4f6}
.error{color:#b91c1c}
.raised{font-size:1.25rem;font-weight:700;color:#15803d}
.contacts{display:flex;justify-content:center;gap:24px;margin:16px 0}
.contacts a{color:#2563eb;font-weight:600}
footer{text-align:center;color:#6b7280;padding:32px}
"#;

/// Campaign copy and the optional links around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Campaign<'a> {
    pub athlete_name: &'a str,
    pub school_name: Option<&'a str>,
    pub school_url: Option<&'a str>,
    pub whatsapp_url: Option<&'a str>,
    pub instagram_url: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl<'a> From<&'a Settings> for Campaign<'a> {
    fn from(settings: &'a Settings) -> Self {
        Self {
            athlete_name: &settings.athlete_name,
            school_name: settings.school_name.as_deref(),
            school_url: settings.school_url.as_deref(),
            whatsapp_url: settings.contact_whatsapp_url.as_deref(),
            instagram_url: settings.contact_instagram_url.as_deref(),
            email: settings.contact_email.as_deref(),
        }
    }
}

impl Campaign<'_> {
    fn school_clause(&self) -> String {
        match (self.school_name, self.school_url) {
            (Some(name), Some(url)) => format!(
                r#" na <a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                escape_html(url),
                escape_html(name)
            ),
            (Some(name), None) => format!(" na {}", escape_html(name)),
            _ => String::new(),
        }
    }

    /// `(href, aria-label, text)` for every configured contact.
    fn contact_links(&self) -> Vec<(String, &'static str, &'static str)> {
        let mut links = Vec::new();
        if let Some(url) = self.whatsapp_url {
            links.push((url.to_string(), "Link para o WhatsApp", "WhatsApp"));
        }
        if let Some(url) = self.instagram_url {
            links.push((url.to_string(), "Link para o Instagram", "Instagram"));
        }
        if let Some(email) = self.email {
            links.push((format!("mailto:{}", email), "Link para enviar e-mail", "E-mail"));
        }
        links
    }
}

pub struct PageContext<'a> {
    pub campaign: Campaign<'a>,
    pub selector: &'a AmountSelector,
    pub checkout: &'a CheckoutState,
    pub prompt: Option<&'a str>,
    pub raised: Option<Decimal>,
    pub year: i32,
}

/// Query string that reproduces the current selection.
pub fn selection_query(selector: &AmountSelector) -> String {
    if selector.custom_input().is_empty() {
        format!("amount={}", selector.amount())
    } else {
        format!("custom={}", selector.custom_input())
    }
}

pub fn render(ctx: &PageContext<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let athlete = escape_html(ctx.campaign.athlete_name);

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Rumo aos EUA | Campanha de {athlete}</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<h1>Rumo aos <span>EUA</span>! Me ajude a voar mais alto.</h1>
<p class="story">Me chamo {athlete}, sou atleta de atletismo e ganhei uma bolsa para estudar e competir nos Estados Unidos{school}. Esta campanha cobre a viagem e os primeiros dias por lá. Se não puder contribuir com qualquer valor, compartilhar esta página já ajuda muito!</p>
<p class="story">Obrigado por fazer parte deste sonho.</p>
</main>
"#,
        school = ctx.campaign.school_clause()
    ));

    render_selector(&mut html, ctx);

    if *ctx.checkout != CheckoutState::Idle {
        render_modal(&mut html, ctx);
    }

    render_footer(&mut html, ctx, &athlete);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_selector(html: &mut String, ctx: &PageContext<'_>) {
    let selector = ctx.selector;

    html.push_str(
        r#"<section id="doar">
<h2>Faça parte desta vitória</h2>
"#,
    );

    if let Some(raised) = ctx.raised {
        html.push_str(&format!(
            "<p class=\"raised\">Arrecadado: {}</p>\n",
            format_brl(raised)
        ));
    }

    html.push_str(
        r#"<p>Escolha um valor abaixo ou digite quanto você gostaria de doar.</p>
<div class="presets">
"#,
    );

    for preset in selector.presets() {
        let class = if selector.is_preset_selected(preset) {
            "preset selected"
        } else {
            "preset"
        };
        html.push_str(&format!(
            "<a class=\"{class}\" href=\"/?amount={preset}#doar\">R$ {preset}</a>\n"
        ));
    }

    html.push_str(&format!(
        r##"</div>
<form method="get" action="/#doar">
<input type="text" name="custom" inputmode="numeric" pattern="[0-9]*" placeholder="{CUSTOM_PLACEHOLDER}" value="{custom}">
<button type="submit">Usar valor</button>
</form>
"##,
        custom = escape_html(selector.custom_input())
    ));

    if let Some(prompt) = ctx.prompt {
        html.push_str(&format!(
            "<p class=\"prompt\" role=\"alert\">{}</p>\n",
            escape_html(prompt)
        ));
    }

    let disabled = if selector.can_checkout() { "" } else { " disabled" };
    let (field, value) = if selector.custom_input().is_empty() {
        ("amount", selector.amount().to_string())
    } else {
        ("custom", selector.custom_input().to_string())
    };

    // POST so that reloading or prefetching the page never creates a charge.
    html.push_str(&format!(
        r##"<form method="post" action="/#doar">
<input type="hidden" name="{field}" value="{value}">
<p>Valor selecionado: <strong>{amount}</strong></p>
<button type="submit" name="donate" value="hosted"{disabled}>{DONATE_LABEL}</button>
<button type="submit" name="donate" value="instant"{disabled}>{PIX_LABEL}</button>
</form>
</section>
"##,
        value = escape_html(&value),
        amount = format_brl(selector.amount()),
    ));
}

fn render_modal(html: &mut String, ctx: &PageContext<'_>) {
    let close_href = format!("/?{}#doar", selection_query(ctx.selector));
    let amount = ctx
        .checkout
        .amount()
        .map(format_brl)
        .unwrap_or_default();

    html.push_str(&format!(
        r#"<div class="modal" role="dialog" aria-modal="true">
<div class="modal-card">
<a class="modal-close" href="{close_href}" aria-label="Fechar">&times;</a>
<h2>Sua doação de {amount}</h2>
"#
    ));

    match ctx.checkout {
        CheckoutState::Idle => {}
        CheckoutState::Opening { .. } => {
            html.push_str("<p>Gerando pagamento...</p>\n");
        }
        CheckoutState::Failed { message, .. } => {
            html.push_str(&format!(
                "<p class=\"error\" role=\"alert\">{}</p>\n",
                escape_html(message)
            ));
        }
        CheckoutState::Ready {
            artifact: PaymentArtifact::RedirectCheckout { url, .. },
            ..
        } => {
            html.push_str(&format!(
                r#"<p>Você será levado ao ambiente seguro do Mercado Pago.</p>
<a class="pay-link" href="{}" rel="noopener noreferrer">{PAY_LINK_LABEL}</a>
"#,
                escape_html(url)
            ));
        }
        CheckoutState::Ready {
            artifact:
                PaymentArtifact::PixPayment {
                    qr_code_image_data_uri,
                    copy_paste_code,
                    ..
                },
            ..
        } => {
            html.push_str(&format!(
                r#"<p>Passo 1: escaneie o QR Code</p>
<img src="{}" alt="QR Code para doação PIX" width="200" height="200">
<p>ou copie o código PIX</p>
<input class="pix-code" type="text" readonly value="{}">
<p>Muito obrigado pela sua contribuição!</p>
"#,
                escape_html(qr_code_image_data_uri),
                escape_html(copy_paste_code)
            ));
        }
    }

    html.push_str("</div>\n</div>\n");
}

fn render_footer(html: &mut String, ctx: &PageContext<'_>, athlete: &str) {
    html.push_str("<footer>\n");

    let links = ctx.campaign.contact_links();
    if !links.is_empty() {
        html.push_str(&format!("<p>{CONTACT_INVITE}</p>\n<nav class=\"contacts\">\n"));
        for (href, label, text) in links {
            html.push_str(&format!(
                "<a href=\"{}\" aria-label=\"{label}\" target=\"_blank\" rel=\"noopener noreferrer\">{text}</a>\n",
                escape_html(&href)
            ));
        }
        html.push_str("</nav>\n");
    }

    html.push_str(&format!(
        "<p>&copy; {year} {athlete}. Uma iniciativa de amigos e família. Pagamentos processados pelo Mercado Pago.</p>\n</footer>\n",
        year = ctx.year
    ));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatusPage {
    Success,
    Failure,
    Pending,
}

impl PaymentStatusPage {
    fn copy(&self) -> (&'static str, &'static str) {
        match self {
            PaymentStatusPage::Success => (
                "Obrigado pela sua doação!",
                "Seu pagamento foi aprovado. Cada contribuição me deixa mais perto do sonho.",
            ),
            PaymentStatusPage::Failure => (
                "O pagamento não foi concluído",
                "Nada foi cobrado. Você pode tentar novamente quando quiser.",
            ),
            PaymentStatusPage::Pending => (
                "Pagamento em processamento",
                "Assim que o Mercado Pago confirmar, sua doação será contabilizada.",
            ),
        }
    }
}

pub fn render_status(page: PaymentStatusPage, athlete_name: &str) -> String {
    let (title, message) = page.copy();

    format!(
        r##"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<h1>{title}</h1>
<p class="story">{message}</p>
<p><a href="/#doar">Voltar para a campanha de {athlete}</a></p>
</main>
</body>
</html>
"##,
        athlete = escape_html(athlete_name)
    )
}
