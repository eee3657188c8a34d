//! Offline answers for when the completion service cannot be reached.
//! A fixed lookup table, not a general capability.

use crate::models::profile::Language;

struct CannedAnswer {
    keywords: &'static [&'static str],
    english: &'static str,
    hindi: &'static str,
}

const CANNED_ANSWERS: &[CannedAnswer] = &[
    CannedAnswer {
        keywords: &["photosynthesis", "प्रकाश संश्लेषण"],
        english: "Photosynthesis is how green plants make their own food. \
                  Leaves take in carbon dioxide from the air and water from the roots, \
                  and chlorophyll uses sunlight to turn them into glucose. \
                  Oxygen is released as a by-product.",
        hindi: "प्रकाश संश्लेषण वह प्रक्रिया है जिससे हरे पौधे अपना भोजन बनाते हैं। \
                पत्तियाँ हवा से कार्बन डाइऑक्साइड और जड़ों से पानी लेती हैं, \
                और क्लोरोफिल सूर्य के प्रकाश की मदद से इन्हें ग्लूकोज़ में बदल देता है। \
                इस दौरान ऑक्सीजन बाहर निकलती है।",
    },
    CannedAnswer {
        keywords: &["gravity", "gravitation", "गुरुत्वाकर्षण"],
        english: "Gravity is the force that pulls objects with mass towards each other. \
                  It keeps us on the ground, makes things fall when dropped, \
                  and keeps the Moon in orbit around the Earth. \
                  Heavier and closer objects pull on each other more strongly.",
        hindi: "गुरुत्वाकर्षण वह बल है जो द्रव्यमान वाली वस्तुओं को एक-दूसरे की ओर खींचता है। \
                इसी के कारण हम ज़मीन पर टिके रहते हैं, गिराई गई चीज़ें नीचे गिरती हैं, \
                और चंद्रमा पृथ्वी के चारों ओर घूमता है।",
    },
];

/// Returns a canned answer if `question` mentions one of the known topics.
pub fn lookup(question: &str, language: Language) -> Option<&'static str> {
    let question = question.to_lowercase();
    CANNED_ANSWERS
        .iter()
        .find(|answer| answer.keywords.iter().any(|k| question.contains(k)))
        .map(|answer| match language {
            Language::English => answer.english,
            Language::Hindi => answer.hindi,
        })
}
