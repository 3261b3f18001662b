//! Rule-based conversational responder.
//!
//! A reply is chosen by walking an ordered table of named rules; the first
//! rule that fires wins. Each rule combines its predicate and its handler in
//! one function that may update the [`ConversationContext`] and returns
//! `Some(reply)` when it matches. The order of [`RULES`] is the priority
//! order and must not be rearranged casually: an utterance that satisfies
//! several keyword sets resolves to whichever rule comes first.

use crate::picker::{RandomPicker, ReplyPicker};
use crate::replies::ReplyBook;
use crate::types::{ConversationContext, ProductType, ProjectType, Reply, ReplyKind, Topic};
use crate::utterance::Utterance;

// =============================================================================
// Keyword sets
// =============================================================================

const HANDOFF: &[&str] = &[
    "agent",
    "human",
    "transfer",
    "speak to someone",
    "representative",
    "connect me",
];
const APPAREL: &[&str] = &["clothes", "jeans", "fashion", "apparel"];
const WEBSITE: &[&str] = &["website", "web", "site"];
const WEBSITE_TECHNOLOGY: &[&str] = &["language", "technology", "tech"];
const WEBSITE_NEW: &[&str] = &["create", "build", "new"];
const WEBSITE_COST: &[&str] = &["cost", "price", "budget"];
const HELP: &[&str] = &["help", "assist", "support"];
const CONSULTATION: &[&str] = &["consultation", "schedule", "discuss"];
const SERVICES: &[&str] = &["service", "offer", "what do you", "you do"];
const BRANDING: &[&str] = &["brand", "logo", "design"];
const MARKETING: &[&str] = &["marketing", "seo", "social", "ads"];
const ECOMMERCE: &[&str] = &["ecommerce", "e-commerce", "shop", "store", "sell online"];
const PRICING: &[&str] = &["price", "cost", "budget", "quote"];
const TIMELINE: &[&str] = &["time", "long", "when", "duration"];
const CONTACT: &[&str] = &["contact", "call", "meet", "talk", "discuss"];
const PORTFOLIO: &[&str] = &["portfolio", "example", "work", "previous"];
const ABOUT: &[&str] = &["about", "company", "who are you"];
const PROCESS: &[&str] = &["process", "how", "work"];
const LOW_SIGNAL_WORDS: &[&str] = &["test", "info"];

/// Inbound message count after which unclear input is answered with an offer
/// to reach a specialist.
const ESCALATION_AFTER: u32 = 3;

// =============================================================================
// Rule table
// =============================================================================

type RuleFn = fn(&ReplyBook, &Utterance, &mut ConversationContext) -> Option<Reply>;

/// A named rule in the priority table.
pub struct Rule {
    pub name: &'static str,
    apply: RuleFn,
}

/// Rules in evaluation order. The default rule at the end always fires.
pub static RULES: &[Rule] = &[
    Rule { name: "handoff", apply: handoff },
    Rule { name: "contact_capture", apply: contact_capture },
    Rule { name: "clarification", apply: clarification },
    Rule { name: "greeting", apply: greeting },
    Rule { name: "clothing_store", apply: clothing_store },
    Rule { name: "website", apply: website },
    Rule { name: "help", apply: help },
    Rule { name: "consultation", apply: consultation },
    Rule { name: "affirmative", apply: affirmative },
    Rule { name: "services", apply: services },
    Rule { name: "branding", apply: branding },
    Rule { name: "marketing", apply: marketing },
    Rule { name: "ecommerce", apply: ecommerce },
    Rule { name: "pricing", apply: pricing },
    Rule { name: "timeline", apply: timeline },
    Rule { name: "contact", apply: contact },
    Rule { name: "portfolio", apply: portfolio },
    Rule { name: "about", apply: about },
    Rule { name: "process", apply: process },
    Rule { name: "low_signal", apply: low_signal },
    Rule { name: "escalation", apply: escalation },
    Rule { name: "default", apply: fallback },
];

fn handoff(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.contains_any(HANDOFF) {
        return None;
    }
    ctx.transfer_requested = true;
    if ctx.contact_provided {
        return Some(Reply::new(ReplyKind::HandoffContactOnFile, book.handoff_contact_on_file()));
    }
    ctx.awaiting_contact = true;
    Some(Reply::new(ReplyKind::Handoff, book.handoff()))
}

fn contact_capture(
    book: &ReplyBook,
    u: &Utterance,
    ctx: &mut ConversationContext,
) -> Option<Reply> {
    if !ctx.awaiting_contact || !u.has_contact_info() {
        return None;
    }
    ctx.contact_provided = true;
    ctx.awaiting_contact = false;
    Some(Reply::new(ReplyKind::ContactReceived, book.contact_received()))
}

fn clarification(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if u.char_len() >= 2 && u.has_alphanumeric() {
        return None;
    }
    // Repeated unreadable input stops looping on "didn't catch that".
    if ctx.message_count > ESCALATION_AFTER {
        return Some(Reply::new(ReplyKind::Escalation, book.escalation()));
    }
    Some(Reply::new(ReplyKind::Clarification, book.clarification()))
}

fn greeting(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.is_greeting() {
        return None;
    }
    if ctx.message_count == 1 {
        Some(Reply::new(ReplyKind::GreetingFirst, book.greeting_first()))
    } else {
        Some(Reply::new(ReplyKind::GreetingLater, book.greeting_later()))
    }
}

fn clothing_store(
    book: &ReplyBook,
    u: &Utterance,
    ctx: &mut ConversationContext,
) -> Option<Reply> {
    if ctx.current_topic != Some(Topic::Ecommerce) || !u.contains_any(APPAREL) {
        return None;
    }
    ctx.product_type = Some(ProductType::Clothing);
    Some(Reply::new(ReplyKind::ClothingStore, book.clothing_store()))
}

fn website(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.contains_any(WEBSITE) {
        return None;
    }
    ctx.current_topic = Some(Topic::Website);

    if u.contains_any(WEBSITE_TECHNOLOGY) {
        return Some(Reply::new(ReplyKind::WebsiteTechnology, book.website_technology()));
    }
    if u.contains_any(WEBSITE_NEW) {
        ctx.project_type = Some(ProjectType::NewWebsite);
        return Some(Reply::new(ReplyKind::WebsiteNew, book.website_new()));
    }
    if u.contains_any(WEBSITE_COST) {
        return Some(Reply::new(ReplyKind::WebsiteCost, book.website_cost()));
    }
    Some(Reply::new(ReplyKind::Website, book.website()))
}

fn help(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.contains_any(HELP) {
        return None;
    }
    if ctx.current_topic == Some(Topic::Website) {
        return Some(Reply::new(ReplyKind::HelpWebsite, book.help_website()));
    }
    Some(Reply::new(ReplyKind::Help, book.help()))
}

fn consultation(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(CONSULTATION)
        .then(|| Reply::new(ReplyKind::Consultation, book.contact_options()))
}

fn affirmative(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.is_affirmative() {
        return None;
    }
    if ctx.current_topic == Some(Topic::Ecommerce) && ctx.product_type.is_some() {
        return Some(Reply::new(
            ReplyKind::AffirmativeClothingStore,
            book.affirmative_clothing_store(),
        ));
    }
    if ctx.current_topic == Some(Topic::Website) {
        return Some(Reply::new(ReplyKind::AffirmativeWebsite, book.affirmative_website()));
    }
    if ctx.transfer_requested && !ctx.contact_provided {
        ctx.awaiting_contact = true;
        return Some(Reply::new(
            ReplyKind::AffirmativeContactRequest,
            book.contact_request(),
        ));
    }
    Some(Reply::new(ReplyKind::Affirmative, book.affirmative()))
}

fn services(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(SERVICES)
        .then(|| Reply::new(ReplyKind::Services, book.services()))
}

fn branding(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.contains_any(BRANDING) {
        return None;
    }
    ctx.current_topic = Some(Topic::Branding);
    Some(Reply::new(ReplyKind::Branding, book.branding()))
}

fn marketing(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.contains_any(MARKETING) {
        return None;
    }
    ctx.current_topic = Some(Topic::Marketing);
    Some(Reply::new(ReplyKind::Marketing, book.marketing()))
}

fn ecommerce(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    if !u.contains_any(ECOMMERCE) {
        return None;
    }
    ctx.current_topic = Some(Topic::Ecommerce);
    Some(Reply::new(ReplyKind::Ecommerce, book.ecommerce()))
}

fn pricing(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(PRICING)
        .then(|| Reply::new(ReplyKind::Pricing, book.pricing()))
}

fn timeline(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(TIMELINE)
        .then(|| Reply::new(ReplyKind::Timeline, book.timeline()))
}

fn contact(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(CONTACT)
        .then(|| Reply::new(ReplyKind::Contact, book.contact_options()))
}

fn portfolio(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(PORTFOLIO)
        .then(|| Reply::new(ReplyKind::Portfolio, book.portfolio()))
}

fn about(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(ABOUT)
        .then(|| Reply::new(ReplyKind::About, book.about()))
}

fn process(book: &ReplyBook, u: &Utterance, _: &mut ConversationContext) -> Option<Reply> {
    u.contains_any(PROCESS)
        .then(|| Reply::new(ReplyKind::Process, book.process()))
}

fn low_signal(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    let short_without_letters = u.char_len() < 4 && !u.has_letters();
    if !u.is_one_of(LOW_SIGNAL_WORDS) && !short_without_letters {
        return None;
    }
    if ctx.current_topic == Some(Topic::Ecommerce) {
        return Some(Reply::new(ReplyKind::LowSignalEcommerce, book.low_signal_ecommerce()));
    }
    Some(Reply::new(ReplyKind::LowSignal, book.low_signal()))
}

fn escalation(book: &ReplyBook, u: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    let unclear = u.char_len() < 5 || !u.has_letters();
    (ctx.message_count > ESCALATION_AFTER && unclear)
        .then(|| Reply::new(ReplyKind::Escalation, book.escalation()))
}

fn fallback(book: &ReplyBook, _: &Utterance, ctx: &mut ConversationContext) -> Option<Reply> {
    Some(match ctx.current_topic {
        Some(topic) => Reply::new(ReplyKind::TopicDefault, book.topic_default(topic)),
        None => Reply::new(ReplyKind::Menu, book.menu()),
    })
}

// =============================================================================
// Responder
// =============================================================================

/// Maps utterances to canned replies given the conversation so far.
///
/// Stateless apart from its reply book and picker; every piece of
/// conversation state lives in the [`ConversationContext`] owned by the
/// caller, one per session.
pub struct Responder {
    book: ReplyBook,
    picker: Box<dyn ReplyPicker>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(ReplyBook::default())
    }
}

impl Responder {
    /// Create a responder that picks welcome lines at random.
    pub fn new(book: ReplyBook) -> Self {
        Self::with_picker(book, Box::new(RandomPicker))
    }

    /// Create a responder with an injected reply picker.
    pub fn with_picker(book: ReplyBook, picker: Box<dyn ReplyPicker>) -> Self {
        Self { book, picker }
    }

    pub fn book(&self) -> &ReplyBook {
        &self.book
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names() -> impl Iterator<Item = &'static str> {
        RULES.iter().map(|r| r.name)
    }

    /// Answer one inbound utterance, taking and returning the context.
    pub fn respond(
        &self,
        mut context: ConversationContext,
        utterance: &str,
    ) -> (Reply, ConversationContext) {
        let reply = self.reply_to(&mut context, utterance);
        (reply, context)
    }

    /// Answer one inbound utterance, updating `context` in place.
    ///
    /// Total over arbitrary input: the final rule always produces a reply.
    pub fn reply_to(&self, context: &mut ConversationContext, utterance: &str) -> Reply {
        let utterance = Utterance::new(utterance);
        context.message_count = context.message_count.saturating_add(1);

        for rule in RULES {
            if let Some(reply) = (rule.apply)(&self.book, &utterance, context) {
                tracing::debug!(
                    rule = rule.name,
                    kind = ?reply.kind,
                    message_count = context.message_count,
                    "Chat rule matched"
                );
                return reply;
            }
        }

        // The default rule always matches; kept for totality.
        Reply::new(ReplyKind::Menu, self.book.menu())
    }

    /// Opening line for a new session, chosen from the welcome pool.
    ///
    /// Does not touch any conversation context.
    pub fn welcome(&self) -> Reply {
        let mut pool = self.book.welcome_pool();
        let idx = self.picker.pick(pool.len()).min(pool.len() - 1);
        Reply::new(ReplyKind::Welcome, pool.swap_remove(idx))
    }
}

// =============================================================================
// Tests
// =============================================================================
