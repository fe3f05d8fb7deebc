use crate::{
    input::TaskDescription,
    models::{EquipmentSelection, MAX_INSTRUCTED_SCORE},
    utils::join_list,
};

pub fn build_equipment_prompt(task: &TaskDescription) -> String {
    format!(
        r#"
건설 안전 전문가로서 다음 작업에 필요한 장비와 준비물을 제안하세요.

[작업 정보]
- 작업명: {task_name}
- 장소: {location}
- 위험 특성: {tags}
- 기타: {risk_context}
- 작업 인원: {workers}명
- 자재: {materials}
- 사용 공구/장비: {tools}
- 보호구: {protective_equipment}
- 작업 환경: {environment}

[요청 사항]
아래 항목에 대해 현장에 꼭 필요한 실질적인 리스트를 작성해서 JSON으로 반환하세요.
1. 보호구 (필수 및 권장)
2. 안전장비 (시설물 포함)
3. 사용 공구/장비
4. 준비자료 (허가서 등)

[JSON 포맷]
각 값은 쉼표로 구분한 하나의 문자열이며, 아래 네 개의 키만 사용하세요.
{{
    "protectors": "안전모, 안전화, ...",
    "safety_equip": "소화기, ...",
    "tools": "...",
    "docs": "..."
}}

설명 없이 JSON 객체 하나만 출력하세요.
"#,
        task_name = task.task_name,
        location = task.location,
        tags = task.tags_joined(),
        risk_context = task.risk_context,
        workers = task.worker_count,
        materials = task.materials,
        tools = task.tools,
        protective_equipment = join_list(&task.protective_equipment),
        environment = task.environment,
    )
}

/// Risk table prompt. Without a selection the task's own equipment fields
/// fill the preparation lines.
pub fn build_risk_table_prompt(
    task: &TaskDescription,
    selection: Option<&EquipmentSelection>,
) -> String {
    let (protectors, safety_equip, tools, docs) = match selection {
        Some(sel) => (
            sel.protectors_joined(),
            sel.safety_equip_joined(),
            sel.tools_joined(),
            sel.docs_joined(),
        ),
        None => (
            join_list(&task.protective_equipment),
            String::new(),
            task.tools.clone(),
            String::new(),
        ),
    };

    format!(
        r#"
건설 안전 전문가(건설안전기술사)로서 아래 작업에 대한 위험성평가표(JSA)를 작성하세요.

[작업 정보]
- 작업명: {task_name}
- 작업 위치: {location}
- 위험 특성: {tags} / {risk_context}
- 작업 인원: {workers}명
- 자재: {materials}
- 보호구: {protectors}
- 안전장비: {safety_equip}
- 사용장비: {tools}
- 준비자료: {docs}
- 작업 환경: {environment}

[작업 규칙]
1. '작업준비' -> '본작업' -> '작업종료/정리' 3단계를 기본으로 하되, '본작업'은 반드시 구체적인 단위 작업명으로 세분화해서 작성하세요. (예: '본작업: 펌프카 설치', '본작업: 타설 진행')
2. '작업준비' 단계의 맨 첫 번째 행은 반드시 '작업자 개인 보호구 및 복장 상태 확인'에 대한 내용이어야 합니다.
3. 각 위험요인별 '대책'은 실질적인 내용으로 반드시 2개~5개 사이로 서로 다르게 작성하세요. (줄바꿈은 반드시 '\n' 문자를 사용하세요. 실제 엔터키 사용 금지)
4. 위험성은 빈도(1~5)와 강도(1~4)의 곱으로 계산하되, 계산된 '위험성' 수치가 절대 {max_score}을 초과하지 않도록 빈도와 강도를 조절하세요. (위험성 <= {max_score})
5. 반드시 JSON 배열 하나만 출력하세요. (Markdown 코드 블록이나 설명 없이 순수 JSON만 출력)

[JSON 예시]
[
    {{"단계": "작업준비", "위험요인": "작업자 복장 불량으로 인한 끼임 사고 위험", "대책": "- 안전모, 안전화, 각반 착용 상태 확인\n- 작업복 소매 및 옷단 정리 정돈\n- 보안경 착용 확인", "빈도": 2, "강도": 3}},
    {{"단계": "본작업: 펌프카 설치", "위험요인": "...", "대책": "- 대책1 ...\n- 대책2 ...", "빈도": 2, "강도": 3}}
]
"#,
        task_name = task.task_name,
        location = task.location,
        tags = task.tags_joined(),
        risk_context = task.risk_context,
        workers = task.worker_count,
        materials = task.materials,
        environment = task.environment,
        max_score = MAX_INSTRUCTED_SCORE,
    )
}
