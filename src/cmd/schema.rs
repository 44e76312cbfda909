//! Schema command - print expected input formats

use crate::input::ClientInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the client data document
    JsonSchema,
    /// Field-by-field listing with the applied defaults
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => self.print_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ClientInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) -> anyhow::Result<()> {
        println!("Client Data Fields (JSON, all optional)");
        println!("=======================================");
        println!();
        for (name, default, description) in FIELD_DESCRIPTIONS {
            println!("{:20} {:28}  {}", name, default, description);
        }
        println!();
        println!("Numeric fields accept bare numbers or Brazilian strings: R$ 1.234,56");
        Ok(())
    }
}

const FIELD_DESCRIPTIONS: &[(&str, &str, &str)] = &[
    ("nome", "CLIENTE NÃO INFORMADO", "Client name"),
    ("doc", "000.000.000-00", "Client CPF/CNPJ (alias: cpf_cnpj)"),
    ("email", "nao_informado@email.com", "Client email"),
    ("telefone", "(00) 00000-0000", "Client phone (alias: celular)"),
    ("endereco", "Endereço não informado", "Client address"),
    ("vendedor", "Consultor Solar", "Sales rep name (alias: nome_vendedor)"),
    ("celular_vendedor", "(11) 99999-9999", "Sales rep phone"),
    ("email_vendedor", "vendedor@empresa.com", "Sales rep email"),
    ("empresa", "Empresa Solar LTDA", "Company name"),
    ("empresa_doc", "00.000.000/0001-00", "Company CNPJ (alias: cnpj)"),
    ("empresa_endereco", "Rua da Energia Solar, 123", "Company address"),
    ("empresa_telefone", "(11) 3333-3333", "Company phone"),
    ("potencia", "5.5 kWp", "Installed power"),
    ("num_paineis", "10", "Panel count"),
    ("producao_media", "1500", "Monthly generation in kWh; < 100 falls back to the kit title"),
    ("consumo_medio", "1350", "Monthly consumption in kWh (display default: 600 kWh)"),
    ("area", "30 m²", "Area display (alias: area_total)"),
    ("area_necessaria", "-", "Numeric area in m², used when area is absent"),
    ("tarifa", "0.92", "Energy tariff in R$/kWh"),
    ("economia_mensal", "R$ 1.142,00", "First-year monthly savings"),
    ("valor_investimento", "R$ 25.000,00", "System investment"),
    ("valor_por_wp", "R$ 4,55", "Price per Wp"),
    ("valor_conta_atual", "R$ 1.200,00", "Current monthly bill"),
    ("valor_conta_solar", "R$ 100,00", "Bill with the system on"),
    ("payback_anos", "3,5", "Payback in years"),
    ("percentual_retorno", "28%", "Yearly return display"),
    ("co2_arvores", "150", "Equivalent trees planted"),
    ("co2_carros", "5", "Equivalent cars off the road"),
    ("co2_25", "75", "Tonnes of CO2 avoided over 25 years"),
    ("validade", "10 Dias", "Proposal validity"),
    ("prazo_instalacao", "30 Dias", "Installation lead time (alias: prazo_entrega)"),
    ("garantia_painel", "25 Anos", "Panel warranty"),
    ("garantia_inversor", "10 Anos", "Inverter warranty"),
    ("garantia_estrutura", "10 Anos", "Mounting warranty"),
    ("garantia_servico", "1 Ano", "Workmanship warranty"),
    ("condicao_pagamento", "À vista ou financiado", "Payment condition"),
    ("forma_pagamento", "PIX, Boleto, Cartão...", "Payment methods"),
    ("especificacao_kit", "Kit Premium c/ Monit...", "Kit title; a kWh figure here backs up producao_media"),
    ("num_proposta", "0001", "Proposal number"),
    ("data_proposta", "today (dd/mm/yyyy)", "Proposal date"),
    ("simulacoes", "3 example rows", "Financing rows: banco, parcelas, valor"),
    ("itens", "4 example rows", "Kit items: desc (alias: descricao, item), qtd"),
];
