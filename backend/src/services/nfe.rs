//! NF-e invoice XML field extraction
//!
//! Pulls the emitter, invoice header and product lines out of a Brazilian
//! NF-e document (the `nfeProc`/`NFe` XML). Extraction is permissive: only
//! the `infNFe` element is mandatory, unparseable numbers read as zero and
//! missing fields stay empty, matching how hand-keyed movements behave.

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::ProductLine;

/// Emitter data extracted from the invoice
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct NfeCompany {
    pub cnpj: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Invoice header data, pre-filled for a new inbound movement
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct NfeMovementData {
    pub nfe: String,
    pub date: Option<NaiveDate>,
    pub total_value: Decimal,
    pub xml_path: Option<String>,
}

/// Everything extracted from one NF-e document
#[derive(Debug, Serialize)]
pub struct NfeImport {
    pub company: NfeCompany,
    pub movement: NfeMovementData,
    pub products: Vec<ProductLine>,
}

#[derive(Default)]
struct AddressParts {
    street: String,
    number: String,
    district: String,
    city: String,
    state: String,
}

impl AddressParts {
    fn assemble(&self) -> Option<String> {
        if self.street.is_empty() && self.city.is_empty() {
            return None;
        }
        Some(format!(
            "{}, {} - {} - {}/{}",
            self.street, self.number, self.district, self.city, self.state
        ))
    }
}

/// Parse an NF-e XML document and extract the import payload.
///
/// Element lookup goes by local name, so namespace prefixes and the optional
/// `nfeProc` wrapper are both tolerated.
pub fn parse_nfe(xml: &str) -> AppResult<NfeImport> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<String> = Vec::new();

    let mut saw_inf_nfe = false;
    let mut company = NfeCompany::default();
    let mut movement = NfeMovementData::default();
    let mut address = AddressParts::default();
    let mut products: Vec<ProductLine> = Vec::new();
    let mut current_line: Option<ProductLine> = None;

    loop {
        match reader.read_event() {
            Err(e) => return Err(AppError::InvalidXml(format!("Malformed XML: {}", e))),
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                if name == "infNFe" {
                    saw_inf_nfe = true;
                } else if name == "det" {
                    current_line = Some(ProductLine {
                        code: String::new(),
                        name: String::new(),
                        unit: "UN".to_string(),
                        quantity: Decimal::ZERO,
                        price: Decimal::ZERO,
                        total: None,
                    });
                }
                stack.push(name);
            }
            Ok(Event::End(_)) => {
                if stack.pop().as_deref() == Some("det") {
                    if let Some(mut line) = current_line.take() {
                        if line.is_complete() {
                            line.total = Some(line.quantity * line.price);
                            products.push(line);
                        }
                    }
                }
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| AppError::InvalidXml(format!("Malformed XML: {}", e)))?
                    .trim()
                    .to_string();
                if !value.is_empty() {
                    capture_field(
                        &stack,
                        value,
                        &mut company,
                        &mut movement,
                        &mut address,
                        &mut current_line,
                    );
                }
            }
            Ok(_) => {}
        }
    }

    if !saw_inf_nfe {
        return Err(AppError::InvalidXml(
            "Document is not an NF-e invoice (missing infNFe)".to_string(),
        ));
    }

    company.address = address.assemble();

    Ok(NfeImport {
        company,
        movement,
        products,
    })
}

fn capture_field(
    stack: &[String],
    value: String,
    company: &mut NfeCompany,
    movement: &mut NfeMovementData,
    address: &mut AddressParts,
    current_line: &mut Option<ProductLine>,
) {
    let field = match stack.last() {
        Some(field) => field.as_str(),
        None => return,
    };
    let parent = match stack.len().checked_sub(2).and_then(|i| stack.get(i)) {
        Some(parent) => parent.as_str(),
        None => return,
    };

    match (parent, field) {
        ("emit", "CNPJ") => company.cnpj = value,
        ("emit", "xNome") => company.name = value,
        ("emit", "fone") | ("enderEmit", "fone") => company.phone = Some(value),
        ("emit", "email") => company.email = Some(value),
        ("enderEmit", "xLgr") => address.street = value,
        ("enderEmit", "nro") => address.number = value,
        ("enderEmit", "xBairro") => address.district = value,
        ("enderEmit", "xMun") => address.city = value,
        ("enderEmit", "UF") => address.state = value,
        ("ide", "nNF") => movement.nfe = value,
        // dhEmi is an RFC 3339 timestamp; only the calendar date matters here
        ("ide", "dhEmi") => {
            movement.date = value.get(..10).and_then(|d| d.parse::<NaiveDate>().ok())
        }
        ("ICMSTot", "vNF") => movement.total_value = parse_decimal(&value),
        ("prod", _) => {
            if let Some(line) = current_line {
                match field {
                    "cProd" => line.code = value,
                    "xProd" => line.name = value,
                    "uCom" => line.unit = value,
                    "qCom" => line.quantity = parse_decimal(&value),
                    "vUnCom" => line.price = parse_decimal(&value),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn parse_decimal(value: &str) -> Decimal {
    value.trim().parse().unwrap_or(Decimal::ZERO)
}
