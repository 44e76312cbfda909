//! Client data model
//!
//! Every field is optional: proposals are routinely generated from partial
//! CRM records, and each missing value has a documented default applied
//! during context assembly. Aliases accept both naming conventions seen in
//! upstream data sources.

use crate::money::RawNumber;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Loosely populated client and system data for one proposal.
///
/// Unknown fields are ignored, so hosts can pass their full CRM record
/// straight through.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClientInput {
    pub nome: Option<String>,
    /// Client CPF or CNPJ
    #[serde(alias = "cpf_cnpj", alias = "cpf")]
    pub doc: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "celular")]
    pub telefone: Option<String>,
    pub endereco: Option<String>,

    #[serde(alias = "nome_vendedor")]
    pub vendedor: Option<String>,
    #[serde(alias = "vendedor_telefone")]
    pub celular_vendedor: Option<String>,
    #[serde(alias = "vendedor_email")]
    pub email_vendedor: Option<String>,

    #[serde(alias = "nome_empresa")]
    pub empresa: Option<String>,
    /// Company CNPJ
    #[serde(alias = "cnpj")]
    pub empresa_doc: Option<String>,
    pub empresa_endereco: Option<String>,
    pub empresa_telefone: Option<String>,

    /// Installed power, e.g. "5.5 kWp"
    #[serde(alias = "potencia_total")]
    pub potencia: Option<RawNumber>,
    pub num_paineis: Option<RawNumber>,
    /// Monthly generation in kWh; values under 100 are treated as
    /// implausible and recovered from the kit title instead
    pub producao_media: Option<RawNumber>,
    /// Monthly consumption in kWh
    pub consumo_medio: Option<RawNumber>,
    /// Literal area display, e.g. "30 m²"
    #[serde(alias = "area_total")]
    pub area: Option<String>,
    /// Numeric area in m², used when `area` is absent
    pub area_necessaria: Option<RawNumber>,

    /// Energy tariff in R$/kWh
    pub tarifa: Option<RawNumber>,
    /// First-year monthly savings in R$
    pub economia_mensal: Option<RawNumber>,
    pub valor_investimento: Option<RawNumber>,
    pub valor_por_wp: Option<RawNumber>,
    pub valor_conta_atual: Option<RawNumber>,
    pub valor_conta_solar: Option<RawNumber>,
    pub payback_anos: Option<RawNumber>,
    pub percentual_retorno: Option<String>,

    #[serde(alias = "arvores_equivalente")]
    pub co2_arvores: Option<RawNumber>,
    pub co2_carros: Option<RawNumber>,
    #[serde(alias = "co2_evitado_25anos")]
    pub co2_25: Option<RawNumber>,

    pub validade: Option<String>,
    #[serde(alias = "prazo_entrega")]
    pub prazo_instalacao: Option<String>,
    pub garantia_painel: Option<String>,
    pub garantia_inversor: Option<String>,
    pub garantia_estrutura: Option<String>,
    pub garantia_servico: Option<String>,

    pub condicao_pagamento: Option<String>,
    pub forma_pagamento: Option<String>,
    /// Kit title, e.g. "Kit Solar 4.200 KWH Growatt"
    pub especificacao_kit: Option<String>,
    pub num_proposta: Option<String>,
    pub data_proposta: Option<String>,

    /// Financing simulations; example rows are shown when absent
    pub simulacoes: Option<Vec<FinancingSim>>,
    /// Kit bill of materials; example rows are shown when absent
    pub itens: Option<Vec<KitItem>>,
}

/// One row of the financing simulation table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FinancingSim {
    pub banco: String,
    /// Instalment count display, e.g. "24x"
    pub parcelas: String,
    /// Instalment value display, e.g. "R$ 1.500,00"
    pub valor: String,
}

/// One row of the kit item table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct KitItem {
    #[serde(alias = "descricao", alias = "item")]
    pub desc: String,
    /// Quantity display; free text so "1 kit" works
    pub qtd: String,
}
