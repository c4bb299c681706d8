//! Prompt templates for the two tasks.
//!
//! Both builders are pure functions of their inputs, so a given OCR text or
//! ingredient list always renders the identical prompt.

use crate::model::{Category, IngredientRef};

/// Timestamp layout stamped into every extraction row. The stamp is computed
/// once per request, interpolated into the prompt as a literal, and echoed
/// back by the model.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Instruction template for extraction and classification.
///
/// Embeds the normalized OCR text, the fixed category vocabulary, the required
/// output shape, the correction policy for OCR noise, and the elision rules.
/// Any prose outside the structured list is forbidden.
pub fn extraction_prompt(ocr_text: &str, observed_at: &str) -> String {
    format!(
        "아래는 OCR로 인식된 텍스트입니다. 상품명이 정확하지 않을 수 있으므로, \
         유사 발음과 일반적인 쇼핑 품목명을 기준으로 보정한 후, 상품명과 수량을 \
         추출하고 각 상품을 아래의 음식 카테고리 중 하나로 분류해 주세요.\n\
         \n\
         ✅ 출력 형식은 다음과 같아야 합니다:\n\
         [[\"상품명\", 수량, \"카테고리\", \"{observed_at}\"], ...]\n\
         \n\
         ❗ 반드시 지켜야 할 조건:\n\
         - 수량이 명시되지 않으면 1로 간주하세요.\n\
         - 단위(개, 팩 등)는 생략하고 숫자만 포함하세요.\n\
         - 상품명이 너무 불분명하거나 카테고리 분류가 어렵다면 제외하세요.\n\
         - 설명 등 다른 텍스트는 절대 포함하지 마세요.\n\
         \n\
         📦 카테고리 목록:\n\
         - {vocabulary}\n\
         \n\
         텍스트:\n\
         {ocr_text}",
        vocabulary = Category::vocabulary(),
    )
}

/// Instruction template for recipe recommendation.
///
/// Embeds the rendered ingredient list and the target recipe count, states the
/// required fields per recipe, and pins the output to a single JSON array with
/// no surrounding prose. The response language is fixed to the deployment
/// locale.
pub fn recommendation_prompt(ingredients: &[IngredientRef], count: u32) -> String {
    let ingredient_str = render_ingredients(ingredients);

    format!(
        "다음은 사용자가 현재 가지고 있는 재료 목록입니다: {ingredient_str}\n\
         \n\
         이 재료 중 일부 또는 전부를 활용하여 만들 수 있는 요리법을 {count}개 추천해 \
         주세요. 각 레시피는 다음 조건을 따라 주세요:\n\
         \n\
         - 레시피 이름\n\
         - 필요한 재료 목록\n\
         - 명확하고 구체적인 조리 방법\n\
         - 사용자 보유 재료를 최대한 활용한 요리\n\
         \n\
         ✅ 출력 형식은 반드시 아래의 JSON 배열 구조를 따르세요 (설명 없이 JSON만 반환):\n\
         \n\
         [\n\
         {{\n\
             \"name\": \"요리 이름\",\n\
             \"ingredients\": [\"재료1\", \"재료2\", ...],\n\
             \"instructions\": \"조리 방법은 명확하고 구체적으로 작성\"\n\
         }},\n\
         ...\n\
         ]\n\
         \n\
         답변은 반드시 한국어로 작성해 주세요."
    )
}

/// `"name quantity"` pairs, comma-joined. The quantity is interpolated
/// verbatim; it is never interpreted here.
fn render_ingredients(ingredients: &[IngredientRef]) -> String {
    ingredients
        .iter()
        .map(|i| format!("{} {}", i.name, i.quantity))
        .collect::<Vec<_>>()
        .join(", ")
}
