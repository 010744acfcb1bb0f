/// Industry keyword groups and the insight shown for each. First match wins.
const INDUSTRIES: &[(&[&str], &str)] = &[
    (
        &["restaurant", "cafe", "food", "bakery", "coffee"],
        "For food service businesses like yours, AI can forecast daily demand from weather, \
         local events and past sales, cutting food waste by 20-30%. Automated customer \
         messages can also bring regulars back with well-timed, personal offers.",
    ),
    (
        &["retail", "store", "shop", "boutique"],
        "Retailers are getting big wins from AI-driven inventory: knowing what will sell \
         before the shelf runs empty. Personalized product recommendations typically lift \
         average order value by 15-25%.",
    ),
    (
        &["law", "attorney", "legal"],
        "Law firms use AI to draft routine documents in minutes instead of hours and to \
         search case law instantly. The time saved usually pays for the tools within the \
         first month.",
    ),
    (
        &["dental", "medical", "clinic", "doctor", "health"],
        "Healthcare practices automate reminders, follow-ups and patient intake, reducing \
         no-shows by up to 30% and giving staff more time for actual patient care.",
    ),
    (
        &["real estate", "realtor", "property"],
        "Real estate pros use AI to write listing descriptions, qualify leads around the \
         clock with a chatbot and spot which listings will move fastest. Many save 10+ \
         hours a week.",
    ),
    (
        &["construction", "contractor", "plumb", "electric", "hvac"],
        "Trades businesses use AI for instant quotes, smarter scheduling and automatic \
         follow-ups with past customers. Maintenance reminders alone can grow repeat \
         business by 40%.",
    ),
    (
        &["salon", "spa", "beauty", "barber"],
        "Salons and spas use AI booking, no-show prediction and personal rebooking \
         reminders. A simple \"time for a touch-up\" message can add 25% more appointments.",
    ),
    (
        &["account", "bookkeep", "tax", "financial"],
        "Financial services firms automate data entry, document processing and client \
         updates. AI can categorize transactions and flag anomalies, saving hours of manual \
         work every week.",
    ),
    (
        &["gym", "fitness", "training", "yoga"],
        "Fitness businesses personalize workout suggestions, predict member churn before it \
         happens and automate class reminders. Retention gains of 15-20% are common.",
    ),
    (
        &["auto", "car", "mechanic", "repair"],
        "Auto shops automate mileage-based service reminders, produce repair estimates \
         faster and follow up on declined work. Follow-ups alone can raise revenue by 25%.",
    ),
];

const GENERIC_INSIGHT: &str = "Every business has repetitive tasks eating up time: emails, \
     scheduling, follow-ups, data entry. AI can take these over and often saves 10-15 hours \
     a week. The question isn't whether AI can help your business, it's which tasks to \
     automate first.";

/// Pick a canned, industry-specific insight for a business description.
pub fn industry_insight(business: &str) -> &'static str {
    let lower = business.to_lowercase();
    INDUSTRIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, insight)| *insight)
        .unwrap_or(GENERIC_INSIGHT)
}
