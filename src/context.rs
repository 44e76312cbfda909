//! Template context assembly
//!
//! Merges client data with the documented defaults into the flat variable
//! map templates consume, attaches the four tables (fluxo, rentabilidade,
//! simulacao, tabela_itens) and the chart images, and duplicates values
//! under every alias key older templates expect.

use crate::charts;
use crate::input::{ClientInput, FinancingSim, KitItem};
use crate::money::{self, format_brl, format_plain, RawNumber};
use crate::projection::Projection;
use crate::render::ChartImage;
use crate::scenarios::{ScenarioRow, SCENARIO_YEAR_ALIASES};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

/// Context-level milestone aliases: `ano_1` is canonical, `anoa` is the
/// spelling used by the older template generation.
const MILESTONE_ALIASES: &[(&str, &str)] = &[
    ("ano_1", "anoa"),
    ("ano_5", "anob"),
    ("ano_10", "anoc"),
    ("ano_25", "anod"),
];

/// The assembled render context: flat variables (scalars and tables) plus
/// the optional chart images. Built fresh for every generation.
#[derive(Debug, Clone)]
pub struct RenderContext {
    values: Map<String, Value>,
    pub comparative_chart: Option<ChartImage>,
    pub return_chart: Option<ChartImage>,
}

impl RenderContext {
    /// All template variables as JSON values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String-valued entries only, for renderers that substitute plain text.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.as_str(), s)))
    }

    /// Full JSON view including chart metadata, for inspection output.
    pub fn to_value(&self) -> Value {
        let mut map = self.values.clone();
        map.insert(
            "grafico_comparativo".to_string(),
            chart_meta(self.comparative_chart.as_ref()),
        );
        map.insert(
            "grafico_retorno".to_string(),
            chart_meta(self.return_chart.as_ref()),
        );
        Value::Object(map)
    }
}

fn chart_meta(image: Option<&ChartImage>) -> Value {
    match image {
        Some(img) => json!({
            "media_type": img.media_type,
            "width_mm": img.width_mm,
            "dpi": img.dpi,
            "bytes": img.bytes.len(),
        }),
        None => Value::String(String::new()),
    }
}

/// Build the final context. Every scalar falls back independently to its
/// default; the list tables fall back to example rows only when the client
/// omits them entirely.
pub fn assemble_context(
    input: &ClientInput,
    investment: Decimal,
    projection: &Projection,
    scenarios: &[ScenarioRow],
    comparative_chart: Option<ChartImage>,
    return_chart: Option<ChartImage>,
) -> RenderContext {
    let mut values = Map::new();

    put(&mut values, "NOME_CLIENTE", text(&input.nome, "CLIENTE NÃO INFORMADO"));
    put(&mut values, "CPF_CNPJ_CLIENTE", text(&input.doc, "000.000.000-00"));
    put(&mut values, "EMAIL_CLIENTE", text(&input.email, "nao_informado@email.com"));
    put(&mut values, "ENDE_CLIENTE", text(&input.endereco, "Endereço não informado"));
    put(&mut values, "CELULAR_CLIENTE", text(&input.telefone, "(00) 00000-0000"));

    put(&mut values, "NOME_VENDEDOR", text(&input.vendedor, "Consultor Solar"));
    put(&mut values, "CELULAR_VENDEDOR", text(&input.celular_vendedor, "(11) 99999-9999"));
    put(&mut values, "EMAIL_VENDEDOR", text(&input.email_vendedor, "vendedor@empresa.com"));

    put(&mut values, "NOME_EMPRESA_DOC", text(&input.empresa, "Empresa Solar LTDA"));
    put(&mut values, "CNPJ", text(&input.empresa_doc, "00.000.000/0001-00"));
    put(&mut values, "ENDE_EMPRESA", text(&input.empresa_endereco, "Rua da Energia Solar, 123"));
    put(&mut values, "CELULAR_EMPRESA", text(&input.empresa_telefone, "(11) 3333-3333"));

    put(&mut values, "POT_TOTAL", unit_text(&input.potencia, "kWp", "5.5 kWp"));
    put(&mut values, "NUM_PAINEL", unit_text(&input.num_paineis, "", "10"));
    // The displayed generation always mirrors the chart's resolved figure
    let generation = charts::resolve_monthly_generation(input);
    put(&mut values, "PRODU_MEDIA", format!("{} kWh", format_plain(generation)));
    put(&mut values, "AREA_TOTAL", area_text(input));
    put(&mut values, "CONSU_MEDIO", unit_text(&input.consumo_medio, "kWh", "600 kWh"));

    put(&mut values, "VAL_INVEST", format_brl(investment));
    put(&mut values, "VALOR_POR_WP", money_text(&input.valor_por_wp, "R$ 4,55"));
    put(&mut values, "VALOR_CONTA_ATUAL", money_text(&input.valor_conta_atual, "R$ 1.200,00"));
    put(&mut values, "VALOR_CONTA_SOLAR", money_text(&input.valor_conta_solar, "R$ 100,00"));
    put(&mut values, "VALOR_ECONOMIA", money_text(&input.economia_mensal, "R$ 1.100,00"));

    put(&mut values, "VALID_PROP", text(&input.validade, "10 Dias"));
    put(&mut values, "PRAZO_ENTR", text(&input.prazo_instalacao, "30 Dias"));
    put(&mut values, "GARAN_PAINEL", text(&input.garantia_painel, "25 Anos"));
    put(&mut values, "GARAN_INVER", text(&input.garantia_inversor, "10 Anos"));
    put(&mut values, "GARAN_ESTRU", text(&input.garantia_estrutura, "10 Anos"));
    put(&mut values, "GARAN_SERVI", text(&input.garantia_servico, "1 Ano"));

    put(&mut values, "ANO_PAYBACK", unit_text(&input.payback_anos, "", "3,5"));
    put(&mut values, "PERC_RETORNO", text(&input.percentual_retorno, "28%"));

    put(&mut values, "CO2_ARVORES", unit_text(&input.co2_arvores, "", "150"));
    put(&mut values, "CO2_CARROS", unit_text(&input.co2_carros, "", "5"));
    put(&mut values, "CO2_25", unit_text(&input.co2_25, "", "75"));

    put(&mut values, "CONDICAO_PAGAMENTO", text(&input.condicao_pagamento, "À vista ou financiado"));
    put(
        &mut values,
        "FORMA_PAGAMENTO",
        text(&input.forma_pagamento, "PIX, Boleto, Cartão ou Financiamento"),
    );
    put(
        &mut values,
        "ESPECIFICACAO_KIT",
        text(&input.especificacao_kit, "Kit Premium c/ Monitoramento WiFi"),
    );
    put(&mut values, "NUM_PROPOSTA", text(&input.num_proposta, "0001"));
    put(&mut values, "DATA_PROPOSTA", proposal_date(input));

    // Projection scalars repeated at context level for cover pages
    put(&mut values, "inves", format_brl(investment));
    let first_monthly = projection
        .years
        .first()
        .map(|y| format_brl(y.monthly_savings))
        .unwrap_or_else(|| "R$ 0,00".to_string());
    put(&mut values, "mensal", first_monthly);
    put(&mut values, "ano_1", format_brl(projection.milestones.year1));
    put(&mut values, "ano_5", format_brl(projection.milestones.year5));
    put(&mut values, "ano_10", format_brl(projection.milestones.year10));
    put(&mut values, "ano_25", format_brl(projection.milestones.year25));
    expand_aliases(&mut values, MILESTONE_ALIASES);

    values.insert("fluxo".to_string(), rows_value(&projection.rows()));
    values.insert("rentabilidade".to_string(), scenario_rows_value(scenarios));
    values.insert("simulacao".to_string(), rows_value(&financing_rows(input)));
    values.insert("tabela_itens".to_string(), rows_value(&kit_rows(input)));

    let scalar_count = values.iter().filter(|(_, v)| v.is_string()).count();
    log::info!(
        "context assembled: {} variables ({} scalars, 4 tables)",
        values.len(),
        scalar_count
    );

    RenderContext {
        values,
        comparative_chart,
        return_chart,
    }
}

fn put(values: &mut Map<String, Value>, key: &str, value: String) {
    values.insert(key.to_string(), Value::String(value));
}

/// Client text or the default; blank strings count as absent.
fn text(value: &Option<String>, default: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.clone(),
        _ => default.to_string(),
    }
}

/// Money display: client text passes through verbatim, bare numbers are
/// formatted as currency.
fn money_text(value: &Option<RawNumber>, default: &str) -> String {
    match value {
        Some(RawNumber::Text(s)) if !s.trim().is_empty() => s.clone(),
        Some(RawNumber::Number(n)) => format_brl(*n),
        _ => default.to_string(),
    }
}

/// Unit display ("5,5 kWp", "10"): client text passes through, bare
/// numbers get a decimal comma and the unit suffix.
fn unit_text(value: &Option<RawNumber>, unit: &str, default: &str) -> String {
    match value {
        Some(RawNumber::Text(s)) if !s.trim().is_empty() => s.clone(),
        Some(RawNumber::Number(n)) => {
            if unit.is_empty() {
                format_plain(*n)
            } else {
                format!("{} {}", format_plain(*n), unit)
            }
        }
        _ => default.to_string(),
    }
}

/// AREA_TOTAL takes the literal display string when present, otherwise is
/// rebuilt from the numeric area field.
fn area_text(input: &ClientInput) -> String {
    if let Some(area) = &input.area {
        if !area.trim().is_empty() {
            return area.clone();
        }
    }
    let needed = money::resolve(input.area_necessaria.as_ref(), Decimal::ZERO);
    if needed > Decimal::ZERO {
        format!("{} m²", format_plain(needed))
    } else {
        "30 m²".to_string()
    }
}

fn proposal_date(input: &ClientInput) -> String {
    match &input.data_proposta {
        Some(date) if !date.trim().is_empty() => date.clone(),
        _ => chrono::Local::now().format("%d/%m/%Y").to_string(),
    }
}

fn rows_value<T: serde::Serialize>(rows: &[T]) -> Value {
    serde_json::to_value(rows).unwrap_or_else(|_| Value::Array(Vec::new()))
}

/// Scenario rows carry both year-key spellings so either template
/// generation finds its tags.
fn scenario_rows_value(rows: &[ScenarioRow]) -> Value {
    let rows = rows
        .iter()
        .map(|row| {
            let mut object = match serde_json::to_value(row) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            };
            expand_aliases(&mut object, SCENARIO_YEAR_ALIASES);
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}

fn expand_aliases(map: &mut Map<String, Value>, aliases: &[(&str, &str)]) {
    for (canonical, alias) in aliases {
        if let Some(value) = map.get(*canonical).cloned() {
            map.insert((*alias).to_string(), value);
        }
    }
}

/// Example financing rows shown when the client supplies none.
fn financing_rows(input: &ClientInput) -> Vec<FinancingSim> {
    match &input.simulacoes {
        Some(rows) => rows.clone(),
        None => vec![
            sim_row("Santander", "24x", "R$ 1.500,00"),
            sim_row("BV Financeira", "36x", "R$ 1.100,00"),
            sim_row("Banco do Brasil", "48x", "R$ 850,00"),
        ],
    }
}

fn sim_row(banco: &str, parcelas: &str, valor: &str) -> FinancingSim {
    FinancingSim {
        banco: banco.to_string(),
        parcelas: parcelas.to_string(),
        valor: valor.to_string(),
    }
}

/// Example kit items shown when the client supplies none.
fn kit_rows(input: &ClientInput) -> Vec<KitItem> {
    match &input.itens {
        Some(rows) => rows.clone(),
        None => vec![
            kit_item("Módulos Fotovoltaicos 550W", "10"),
            kit_item("Inversor 5kW", "1"),
            kit_item("Estrutura de Fixação", "4"),
            kit_item("Cabos e Conectores", "1 kit"),
        ],
    }
}

fn kit_item(desc: &str, qtd: &str) -> KitItem {
    KitItem {
        desc: desc.to_string(),
        qtd: qtd.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, MilestonePolicy, DEFAULT_INVESTMENT};
    use crate::scenarios::compare_scenarios;
    use rust_decimal_macros::dec;

    fn context_for(input: &ClientInput) -> RenderContext {
        let investment =
            money::resolve(input.valor_investimento.as_ref(), DEFAULT_INVESTMENT);
        let projection = project(investment, input, MilestonePolicy::AsComputed);
        let scenarios =
            compare_scenarios(investment, projection.first_year_monthly(), &projection.milestones);
        assemble_context(input, investment, &projection, &scenarios, None, None)
    }

    fn scalar<'a>(ctx: &'a RenderContext, key: &str) -> &'a str {
        ctx.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| panic!("missing scalar {}", key))
    }

    #[test]
    fn empty_input_gets_every_documented_default() {
        let ctx = context_for(&ClientInput::default());

        assert_eq!(scalar(&ctx, "NOME_CLIENTE"), "CLIENTE NÃO INFORMADO");
        assert_eq!(scalar(&ctx, "CPF_CNPJ_CLIENTE"), "000.000.000-00");
        assert_eq!(scalar(&ctx, "EMAIL_CLIENTE"), "nao_informado@email.com");
        assert_eq!(scalar(&ctx, "ENDE_CLIENTE"), "Endereço não informado");
        assert_eq!(scalar(&ctx, "CELULAR_CLIENTE"), "(00) 00000-0000");
        assert_eq!(scalar(&ctx, "NOME_VENDEDOR"), "Consultor Solar");
        assert_eq!(scalar(&ctx, "NOME_EMPRESA_DOC"), "Empresa Solar LTDA");
        assert_eq!(scalar(&ctx, "CNPJ"), "00.000.000/0001-00");
        assert_eq!(scalar(&ctx, "POT_TOTAL"), "5.5 kWp");
        assert_eq!(scalar(&ctx, "NUM_PAINEL"), "10");
        assert_eq!(scalar(&ctx, "AREA_TOTAL"), "30 m²");
        assert_eq!(scalar(&ctx, "CONSU_MEDIO"), "600 kWh");
        assert_eq!(scalar(&ctx, "VAL_INVEST"), "R$ 25.000,00");
        assert_eq!(scalar(&ctx, "VALOR_POR_WP"), "R$ 4,55");
        assert_eq!(scalar(&ctx, "VALOR_CONTA_ATUAL"), "R$ 1.200,00");
        assert_eq!(scalar(&ctx, "VALOR_CONTA_SOLAR"), "R$ 100,00");
        assert_eq!(scalar(&ctx, "VALOR_ECONOMIA"), "R$ 1.100,00");
        assert_eq!(scalar(&ctx, "VALID_PROP"), "10 Dias");
        assert_eq!(scalar(&ctx, "PRAZO_ENTR"), "30 Dias");
        assert_eq!(scalar(&ctx, "GARAN_PAINEL"), "25 Anos");
        assert_eq!(scalar(&ctx, "GARAN_SERVI"), "1 Ano");
        assert_eq!(scalar(&ctx, "ANO_PAYBACK"), "3,5");
        assert_eq!(scalar(&ctx, "PERC_RETORNO"), "28%");
        assert_eq!(scalar(&ctx, "CO2_ARVORES"), "150");
        assert_eq!(scalar(&ctx, "CONDICAO_PAGAMENTO"), "À vista ou financiado");
        assert_eq!(scalar(&ctx, "FORMA_PAGAMENTO"), "PIX, Boleto, Cartão ou Financiamento");
        assert_eq!(scalar(&ctx, "ESPECIFICACAO_KIT"), "Kit Premium c/ Monitoramento WiFi");
        assert_eq!(scalar(&ctx, "NUM_PROPOSTA"), "0001");
        assert!(!scalar(&ctx, "DATA_PROPOSTA").is_empty());

        // Default generation is the 1500 fallback
        assert_eq!(scalar(&ctx, "PRODU_MEDIA"), "1500 kWh");
        assert_eq!(scalar(&ctx, "mensal"), "R$ 1.142,00");
        assert_eq!(scalar(&ctx, "ano_1"), "R$ 13.704,00");
    }

    #[test]
    fn tables_are_attached_with_example_fallbacks() {
        let ctx = context_for(&ClientInput::default());

        let fluxo = ctx.get("fluxo").and_then(|v| v.as_array()).unwrap();
        assert_eq!(fluxo.len(), 25);
        assert_eq!(fluxo[0]["ano"], "1");
        assert_eq!(fluxo[0]["fat_c_sol"], "R$ 100,00");

        let rent = ctx.get("rentabilidade").and_then(|v| v.as_array()).unwrap();
        assert_eq!(rent.len(), 3);

        let sims = ctx.get("simulacao").and_then(|v| v.as_array()).unwrap();
        assert_eq!(sims.len(), 3);
        assert_eq!(sims[0]["banco"], "Santander");
        assert_eq!(sims[0]["parcelas"], "24x");

        let itens = ctx.get("tabela_itens").and_then(|v| v.as_array()).unwrap();
        assert_eq!(itens.len(), 4);
        assert_eq!(itens[3]["qtd"], "1 kit");
    }

    #[test]
    fn scenario_rows_carry_both_year_key_spellings() {
        let ctx = context_for(&ClientInput::default());
        let rent = ctx.get("rentabilidade").and_then(|v| v.as_array()).unwrap();
        for row in rent {
            assert_eq!(row["ano1"], row["1ano"]);
            assert_eq!(row["ano5"], row["5anos"]);
            assert_eq!(row["ano10"], row["10anos"]);
            assert_eq!(row["ano25"], row["25anos"]);
        }
    }

    #[test]
    fn milestone_scalars_carry_both_spellings() {
        let ctx = context_for(&ClientInput::default());
        assert_eq!(ctx.get("ano_1"), ctx.get("anoa"));
        assert_eq!(ctx.get("ano_5"), ctx.get("anob"));
        assert_eq!(ctx.get("ano_10"), ctx.get("anoc"));
        assert_eq!(ctx.get("ano_25"), ctx.get("anod"));
    }

    #[test]
    fn client_fields_override_defaults() {
        let input = ClientInput {
            nome: Some("Maria Souza".to_string()),
            valor_conta_atual: Some(RawNumber::Number(dec!(900))),
            garantia_painel: Some("30 Anos".to_string()),
            num_paineis: Some(RawNumber::Number(dec!(14))),
            ..Default::default()
        };
        let ctx = context_for(&input);
        assert_eq!(scalar(&ctx, "NOME_CLIENTE"), "Maria Souza");
        assert_eq!(scalar(&ctx, "VALOR_CONTA_ATUAL"), "R$ 900,00");
        assert_eq!(scalar(&ctx, "GARAN_PAINEL"), "30 Anos");
        assert_eq!(scalar(&ctx, "NUM_PAINEL"), "14");
    }

    #[test]
    fn blank_strings_fall_back_like_missing_fields() {
        let input = ClientInput {
            nome: Some("   ".to_string()),
            email: Some(String::new()),
            ..Default::default()
        };
        let ctx = context_for(&input);
        assert_eq!(scalar(&ctx, "NOME_CLIENTE"), "CLIENTE NÃO INFORMADO");
        assert_eq!(scalar(&ctx, "EMAIL_CLIENTE"), "nao_informado@email.com");
    }

    #[test]
    fn displayed_generation_matches_chart_resolution() {
        let input = ClientInput {
            especificacao_kit: Some("Kit Solar 4.200 KWH Growatt".to_string()),
            ..Default::default()
        };
        let ctx = context_for(&input);
        assert_eq!(scalar(&ctx, "PRODU_MEDIA"), "4200 kWh");
        assert_eq!(charts::resolve_monthly_generation(&input), dec!(4200));
    }

    #[test]
    fn area_is_rebuilt_from_numeric_field_when_display_missing() {
        let input = ClientInput {
            area_necessaria: Some(RawNumber::Number(dec!(42.5))),
            ..Default::default()
        };
        let ctx = context_for(&input);
        assert_eq!(scalar(&ctx, "AREA_TOTAL"), "42,5 m²");

        let input = ClientInput {
            area: Some("50 m²".to_string()),
            area_necessaria: Some(RawNumber::Number(dec!(42.5))),
            ..Default::default()
        };
        let ctx = context_for(&input);
        assert_eq!(scalar(&ctx, "AREA_TOTAL"), "50 m²");
    }

    #[test]
    fn investment_flows_from_client_value() {
        let input = ClientInput {
            valor_investimento: Some(RawNumber::Text("R$ 30.000,00".to_string())),
            ..Default::default()
        };
        let ctx = context_for(&input);
        assert_eq!(scalar(&ctx, "VAL_INVEST"), "R$ 30.000,00");
        assert_eq!(scalar(&ctx, "inves"), "R$ 30.000,00");
    }

    #[test]
    fn missing_charts_serialize_as_empty_strings() {
        let ctx = context_for(&ClientInput::default());
        let value = ctx.to_value();
        assert_eq!(value["grafico_comparativo"], "");
        assert_eq!(value["grafico_retorno"], "");
    }

    #[test]
    fn client_tables_pass_through_verbatim() {
        let input: ClientInput = serde_json::from_str(
            r#"{
                "simulacoes": [{"banco": "Caixa", "parcelas": "60x", "valor": "R$ 700,00"}],
                "itens": [{"desc": "Microinversor", "qtd": "8"}]
            }"#,
        )
        .unwrap();
        let ctx = context_for(&input);
        let sims = ctx.get("simulacao").and_then(|v| v.as_array()).unwrap();
        assert_eq!(sims.len(), 1);
        assert_eq!(sims[0]["banco"], "Caixa");
        let itens = ctx.get("tabela_itens").and_then(|v| v.as_array()).unwrap();
        assert_eq!(itens.len(), 1);
        assert_eq!(itens[0]["desc"], "Microinversor");
    }
}
