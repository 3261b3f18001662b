//! Canned reply texts.
//!
//! Replies are composed without an LLM. Contact details, business hours and
//! response windows come from the configured agency profile; everything else
//! is fixed copy. List markup (`<ol>`, `<ul>`, `<li>`) and links are rendered
//! as-is by the chat widget.

use melba_core::config::AgencyConfig;

use crate::types::Topic;

/// Services menu shared by the services rule and the services quick reply.
const SERVICES_MENU: &str = "Our digital solutions:<ol>\
    <li>Web Development ($2,500-$15,000+)</li>\
    <li>Branding & Design ($500-$2,000)</li>\
    <li>Digital Marketing ($1,000-$5,000/month)</li>\
    <li>E-commerce Solutions ($2,000-$8,000)</li>\
    </ol>Which interests you most?";

// =============================================================================
// ReplyBook
// =============================================================================

/// Produces reply texts for one agency profile.
#[derive(Debug, Clone)]
pub struct ReplyBook {
    agency: AgencyConfig,
}

impl Default for ReplyBook {
    fn default() -> Self {
        Self::new(AgencyConfig::default())
    }
}

impl ReplyBook {
    pub fn new(agency: AgencyConfig) -> Self {
        Self { agency }
    }

    // -----------------------------------------------------------------
    // Session opening
    // -----------------------------------------------------------------

    /// Pool of opening lines shown when the widget opens.
    pub fn welcome_pool(&self) -> Vec<String> {
        let name = &self.agency.name;
        vec![
            format!("Hello! Welcome to {name} Digital Agency. How can we assist you today?"),
            "Hi there! Thanks for reaching out. What brings you to our site today?".to_string(),
            "Welcome! We're here to help with your digital needs. What can we do for you?"
                .to_string(),
        ]
    }

    // -----------------------------------------------------------------
    // Handoff and contact capture
    // -----------------------------------------------------------------

    pub fn handoff(&self) -> String {
        format!(
            "I understand you'd like to speak with a human agent. I'm connecting you now. \
             Please provide your email or phone number, and our team will contact you within \
             {} minutes during business hours ({}).",
            self.agency.callback_minutes, self.agency.business_hours
        )
    }

    pub fn handoff_contact_on_file(&self) -> String {
        format!(
            "We already have your contact details, so a member of our team will reach out within \
             {} minutes during business hours ({}). Is there anything you'd like them to know \
             before the call?",
            self.agency.callback_minutes, self.agency.business_hours
        )
    }

    pub fn contact_received(&self) -> String {
        format!(
            "Perfect! I've received your contact information. Our specialist will reach out to \
             you within {} minutes during business hours ({}) to discuss your project. \
             Thank you for choosing {}!",
            self.agency.callback_minutes, self.agency.business_hours, self.agency.name
        )
    }

    pub fn contact_request(&self) -> String {
        format!(
            "Perfect! Please provide your email or phone number, and our team will contact you \
             within {} minutes during business hours.",
            self.agency.callback_minutes
        )
    }

    // -----------------------------------------------------------------
    // Small talk
    // -----------------------------------------------------------------

    pub fn clarification(&self) -> String {
        "I didn't quite catch that. Could you please tell me how I can help you today?".to_string()
    }

    pub fn greeting_first(&self) -> String {
        "Hello! I'm doing great, thank you for asking! I'm here to help you with your digital \
         transformation needs. Are you looking for web development, branding, digital marketing, \
         or something else?"
            .to_string()
    }

    pub fn greeting_later(&self) -> String {
        "I'm doing well, thanks! How can I continue helping you with your project today?"
            .to_string()
    }

    // -----------------------------------------------------------------
    // Websites and stores
    // -----------------------------------------------------------------

    pub fn clothing_store(&self) -> String {
        "Excellent! A clothing e-commerce store is a great business. For fashion/apparel sites, \
         we typically include:<ul>\
         <li>Product galleries with zoom</li>\
         <li>Size charts and filters</li>\
         <li>Inventory management</li>\
         <li>Mobile-optimized checkout</li>\
         <li>Social media integration</li>\
         </ul>Would you like a quote or prefer to schedule a consultation?"
            .to_string()
    }

    pub fn website_technology(&self) -> String {
        "Great question! We use modern technologies like React, Node.js, and WordPress depending \
         on your needs. For most business websites, we recommend WordPress or custom \
         HTML/CSS/JavaScript. For complex web apps, we use React or Vue.js. What type of website \
         functionality do you need?"
            .to_string()
    }

    pub fn website_new(&self) -> String {
        "Perfect! To recommend the best solution:<ol>\
         <li>Business type</li>\
         <li>E-commerce needed?</li>\
         <li>Budget range</li>\
         </ol>"
            .to_string()
    }

    pub fn website_cost(&self) -> String {
        "Website costs depend on complexity: Basic business sites ($2,500-$5,000), Professional \
         sites with CMS ($5,000-$15,000), E-commerce sites ($8,000-$25,000), Custom web \
         applications ($15,000+). What features do you need?"
            .to_string()
    }

    pub fn website(&self) -> String {
        "Excellent! We specialize in custom website development. Are you looking for a business \
         website, e-commerce store, or web application? Also, what industry is your business in?"
            .to_string()
    }

    // -----------------------------------------------------------------
    // Help and scheduling
    // -----------------------------------------------------------------

    pub fn help_website(&self) -> String {
        "I'm here to help with your website project! I can assist with: technology \
         recommendations, pricing estimates, timeline planning, feature suggestions, and \
         connecting you with our development team. What specific aspect would you like to know \
         more about?"
            .to_string()
    }

    pub fn help(&self) -> String {
        "I'm here to help! I can assist you with: Web Development, Branding & Design, Digital \
         Marketing, E-commerce Solutions, pricing information, project timelines, and connecting \
         you with our specialists. What interests you most?"
            .to_string()
    }

    /// Contact channels; shared by the consultation and contact rules.
    pub fn contact_options(&self) -> String {
        format!(
            "Contact options:<ol>\
             <li>Email: {}</li>\
             <li>Call: {}</li>\
             <li>Free consultation</li>\
             </ol>We respond within {} hours. Preferred method?",
            self.agency.email, self.agency.phone, self.agency.response_hours
        )
    }

    // -----------------------------------------------------------------
    // Affirmative follow-ups
    // -----------------------------------------------------------------

    pub fn affirmative_clothing_store(&self) -> String {
        "Great! For your clothing store, would you like:<ol>\
         <li>Get a detailed quote</li>\
         <li>Schedule a consultation call</li>\
         <li>See similar portfolio examples</li>\
         </ol>"
            .to_string()
    }

    pub fn affirmative_website(&self) -> String {
        "To create your website, I need:<ol>\
         <li>Business type/industry</li>\
         <li>Existing branding (logo, colors)</li>\
         <li>Required features</li>\
         <li>Target launch date</li>\
         </ol>"
            .to_string()
    }

    pub fn affirmative(&self) -> String {
        "Wonderful! To better assist you, could you tell me which service interests you most: \
         Web Development, Branding, Digital Marketing, or E-commerce? Or would you prefer to \
         schedule a free consultation to discuss your specific needs?"
            .to_string()
    }

    // -----------------------------------------------------------------
    // Services
    // -----------------------------------------------------------------

    pub fn services(&self) -> String {
        SERVICES_MENU.to_string()
    }

    pub fn branding(&self) -> String {
        "Excellent choice! Our branding services include logo design, brand identity, color \
         schemes, typography, business cards, and brand guidelines. Are you starting a new \
         business or rebranding an existing one? What industry are you in?"
            .to_string()
    }

    pub fn marketing(&self) -> String {
        "Digital marketing services:<ul>\
         <li>SEO - Improve Google rankings</li>\
         <li>Google Ads - Immediate traffic</li>\
         <li>Social Media - Facebook, Instagram, LinkedIn</li>\
         <li>Content Marketing</li>\
         <li>Email Campaigns</li>\
         </ul>What's your main goal?"
            .to_string()
    }

    pub fn ecommerce(&self) -> String {
        "Perfect! We build custom e-commerce solutions with secure payment processing, inventory \
         management, mobile optimization, and SEO. Are you starting a new online store or \
         improving an existing one? What products will you be selling?"
            .to_string()
    }

    pub fn pricing(&self) -> String {
        "I'd be happy to provide pricing information! Our services range from $500 (basic \
         branding) to $25,000+ (complex websites). For an accurate quote, I need to understand \
         your specific needs. Would you prefer a quick 15-minute consultation call to discuss \
         your project and get exact pricing?"
            .to_string()
    }

    pub fn timeline(&self) -> String {
        "Project timelines:<ul>\
         <li>Logo design: 3-5 days</li>\
         <li>Basic websites: 2-3 weeks</li>\
         <li>Professional websites: 4-6 weeks</li>\
         <li>E-commerce sites: 6-8 weeks</li>\
         <li>Complex web apps: 8-12 weeks</li>\
         </ul>What's your ideal timeline?"
            .to_string()
    }

    pub fn portfolio(&self) -> String {
        "We've helped clients achieve: 300%+ traffic increases, 250% sales growth, 98% client \
         satisfaction rate. Recent projects include e-commerce stores, SaaS platforms, and \
         corporate websites. What industry is your business in so I can show relevant examples?"
            .to_string()
    }

    pub fn about(&self) -> String {
        format!(
            "{} is a full-service digital agency founded to help local businesses become global \
             brands. We've completed 200+ projects, serve clients in 25+ countries, maintain 98% \
             client satisfaction, and have a team of 15+ certified professionals. How can we help \
             transform your business?",
            self.agency.name
        )
    }

    pub fn process(&self) -> String {
        "Our process:<ol>\
         <li>Discovery (1-2 days)</li>\
         <li>Strategy (2-3 days)</li>\
         <li>Implementation (2-12 weeks)</li>\
         <li>Optimization (ongoing)</li>\
         </ol>Questions about any step?"
            .to_string()
    }

    // -----------------------------------------------------------------
    // Fallbacks
    // -----------------------------------------------------------------

    pub fn low_signal_ecommerce(&self) -> String {
        "I'm here to help with your e-commerce project! What specific information do you need \
         about building your online store?"
            .to_string()
    }

    pub fn low_signal(&self) -> String {
        "I'm here to help! What specific information are you looking for? I can assist with \
         services, pricing, timelines, or connect you with our team."
            .to_string()
    }

    pub fn escalation(&self) -> String {
        format!(
            "I want to make sure I'm giving you the most helpful information. Would you prefer to \
             speak with one of our specialists directly? I can arrange a quick call, or you can \
             email us at {} with your questions.",
            self.agency.email
        )
    }

    pub fn topic_default(&self, topic: Topic) -> String {
        format!(
            "I'd love to help you with your {} project! Could you share more specific details \
             about what you're looking for? Or would you prefer to schedule a free consultation \
             to discuss your needs in detail?",
            topic
        )
    }

    pub fn menu(&self) -> String {
        "I want to give you the most relevant information. Are you interested in: Web \
         Development, Branding, Digital Marketing, or E-commerce? Or would you prefer to speak \
         directly with one of our specialists?"
            .to_string()
    }

    // -----------------------------------------------------------------
    // Quick replies
    // -----------------------------------------------------------------

    pub fn quick_services(&self) -> String {
        SERVICES_MENU.to_string()
    }

    pub fn quick_contact(&self) -> String {
        format!(
            "Perfect! Here are the best ways to reach us: Email: {} ({}-hour response), \
             Phone: {} ({}), or visit our <a href='{}' target='_blank'>contact page</a> for a \
             free consultation form. What's your preferred contact method?",
            self.agency.email,
            self.agency.response_hours,
            self.agency.phone,
            self.agency.business_hours,
            self.agency.contact_page
        )
    }

    pub fn quick_help(&self) -> String {
        "I'm here to help! I can assist with: service information, pricing estimates, project \
         timelines, portfolio examples, or connecting you directly with our specialists. What \
         would be most helpful for you right now?"
            .to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_agency() -> AgencyConfig {
        AgencyConfig {
            name: "Acme Digital".to_string(),
            email: "hello@acme.test".to_string(),
            phone: "+1 (555) 010-0000".to_string(),
            business_hours: "8 AM - 4 PM PST".to_string(),
            callback_minutes: 30,
            response_hours: 4,
            contact_page: "/get-in-touch".to_string(),
        }
    }

    #[test]
    fn test_welcome_pool_has_three_lines() {
        let pool = ReplyBook::default().welcome_pool();
        assert_eq!(pool.len(), 3);
        assert!(pool[0].contains("MelbaSolution"));
        assert!(pool.iter().all(|line| !line.is_empty()));
    }

    #[test]
    fn test_handoff_uses_agency_profile() {
        let book = ReplyBook::new(custom_agency());
        let text = book.handoff();
        assert!(text.contains("30 minutes"));
        assert!(text.contains("8 AM - 4 PM PST"));
        assert!(text.contains("email or phone number"));
    }

    #[test]
    fn test_default_profile_values_in_replies() {
        let book = ReplyBook::default();
        assert!(book.handoff().contains("15 minutes"));
        assert!(book.contact_options().contains("contact@melbasolution.com"));
        assert!(book.contact_options().contains("+1 (206) 240-9455"));
        assert!(book.contact_options().contains("within 2 hours"));
        assert!(book.contact_received().contains("Thank you for choosing MelbaSolution!"));
    }

    #[test]
    fn test_contact_options_is_ordered_list() {
        let book = ReplyBook::new(custom_agency());
        let text = book.contact_options();
        assert!(text.contains("<ol>"));
        assert!(text.contains("<li>Email: hello@acme.test</li>"));
        assert!(text.contains("<li>Call: +1 (555) 010-0000</li>"));
        assert!(text.contains("within 4 hours"));
    }

    #[test]
    fn test_clothing_store_lists_features() {
        let text = ReplyBook::default().clothing_store();
        assert!(text.contains("<ul>"));
        assert_eq!(text.matches("<li>").count(), 5);
        assert!(text.contains("Size charts"));
    }

    #[test]
    fn test_topic_default_names_topic() {
        let book = ReplyBook::default();
        assert!(book.topic_default(Topic::Branding).contains("your branding project"));
        assert!(book.topic_default(Topic::Ecommerce).contains("your ecommerce project"));
    }

    #[test]
    fn test_about_and_escalation_use_profile() {
        let book = ReplyBook::new(custom_agency());
        assert!(book.about().starts_with("Acme Digital is a full-service"));
        assert!(book.escalation().contains("hello@acme.test"));
    }

    #[test]
    fn test_quick_contact_links_contact_page() {
        let book = ReplyBook::new(custom_agency());
        let text = book.quick_contact();
        assert!(text.contains("href='/get-in-touch'"));
        assert!(text.contains("4-hour response"));
    }

    #[test]
    fn test_services_menu_shared() {
        let book = ReplyBook::default();
        assert_eq!(book.services(), book.quick_services());
        assert_eq!(book.services().matches("<li>").count(), 4);
    }

    #[test]
    fn test_greeting_variants_differ() {
        let book = ReplyBook::default();
        assert_ne!(book.greeting_first(), book.greeting_later());
    }
}
