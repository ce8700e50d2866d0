pub const SYSTEM_PROMPT: &str =
    "You are a financial data extraction expert. Always return valid JSON only.";

pub fn build_extraction_prompt(document_text: &str) -> String {
    format!(
        r#"You are a financial data extraction expert. Extract entities and relationships from the following text from a company annual report.

EXTRACTION REQUIREMENTS:
1. ENTITIES to extract:
   - Company: every company name mentioned (e.g. "Reliance Retail", "Jio", "Hamleys")
   - RiskFactor: every risk factor mentioned (e.g. "Market volatility", "Regulatory changes")
   - Amount: financial figures in any currency (e.g. "$1.5 billion", "₹50,000 crores")

2. RELATIONSHIPS to extract:
   - OWNS: Company OWNS Company (e.g. "Reliance Retail OWNS Hamleys")
   - HAS: Company HAS Amount (e.g. "Reliance Retail HAS $2.5 billion revenue")
   - FACES: Company FACES RiskFactor (e.g. "Reliance FACES Market volatility")
   - PARTNERS_WITH: Company PARTNERS_WITH Company (e.g. "Jio PARTNERS_WITH Google")

OUTPUT FORMAT (strict JSON):
{{
  "entities": [
    {{"id": "company_reliance_retail", "type": "Company", "name": "Reliance Retail", "value": null, "metadata": {{}}}},
    {{"id": "amount_revenue_2023", "type": "Amount", "name": "Revenue 2023", "value": "$2.5 billion", "metadata": {{"currency": "USD", "year": 2023}}}},
    {{"id": "risk_market_volatility", "type": "RiskFactor", "name": "Market volatility", "value": null, "metadata": {{}}}}
  ],
  "relationships": [
    {{"source": "company_reliance_retail", "target": "amount_revenue_2023", "type": "HAS", "metadata": {{}}}},
    {{"source": "company_reliance_retail", "target": "risk_market_volatility", "type": "FACES", "metadata": {{"year": 2023}}}}
  ]
}}

RULES:
- Every entity id must be unique and non-empty (e.g. "company_reliance_retail", "amount_revenue_2023")
- "type" of an entity must be exactly one of: Company, RiskFactor, Amount
- "type" of a relationship must be exactly one of: OWNS, HAS, FACES, PARTNERS_WITH
- Every relationship "source" and "target" must be the id of an entity in "entities"
- Metadata values must be plain strings, numbers or booleans
- Extract ALL company names, risk factors and amounts, and ALL relationships between them
- Use your understanding of the text, not pattern matching

TEXT TO ANALYZE:
{}

Return ONLY the JSON object, no additional text or explanation."#,
        document_text
    )
}
