//! Meal plan prompt construction.

use super::MealPlanRequest;

/// Per-day contents the service is asked to cover.
const DAY_CONTENTS: &str = "For each day, provide:
- Breakfast with carb content
- Lunch with carb content
- Dinner with carb content
- 2-3 high-carb snacks with carb content
- Daily total carb count";

/// Content directives: digestibility, GI safety, accessibility, hydration.
const DIRECTIVES: &str = "Focus on:
- Easily digestible carbs
- Foods that won't cause GI distress
- Practical, accessible ingredients
- Proper hydration recommendations";

/// Example schema the reply is asked to mimic.
pub const SCHEMA_EXAMPLE: &str = r#"Format the response as JSON with this structure:
{
  "day_1": {
    "breakfast": {"meal": "description", "carbs": number},
    "lunch": {"meal": "description", "carbs": number},
    "dinner": {"meal": "description", "carbs": number},
    "snacks": [{"snack": "description", "carbs": number}],
    "total_carbs": number,
    "hydration_notes": "string"
  },
  "day_2": { ... },
  "day_3": { ... }
}"#;

/// Render the restriction and preference sentences.
///
/// Each sentence is omitted when its list is empty, so an unconstrained
/// request yields an empty string.
pub fn dietary_info(request: &MealPlanRequest) -> String {
    let mut info = String::new();
    if !request.dietary_restrictions.is_empty() {
        info.push_str(&format!(
            "Dietary restrictions: {}. ",
            request.dietary_restrictions.join(", ")
        ));
    }
    if !request.meal_preferences.is_empty() {
        info.push_str(&format!(
            "Meal preferences: {}. ",
            request.meal_preferences.join(", ")
        ));
    }
    info
}

/// Build the full instruction sent to the generative service.
pub fn build_prompt(request: &MealPlanRequest) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(&format!(
        "Create a detailed {days}-day carb loading meal plan for a marathon runner who needs {grams}g of carbs per day.\n\n",
        days = request.days,
        grams = request.daily_carb_grams,
    ));

    let info = dietary_info(request);
    if !info.is_empty() {
        prompt.push_str(&info);
        prompt.push_str("\n\n");
    }

    prompt.push_str(DAY_CONTENTS);
    prompt.push_str("\n\n");
    prompt.push_str(DIRECTIVES);
    prompt.push_str("\n\n");
    prompt.push_str(SCHEMA_EXAMPLE);

    prompt
}
