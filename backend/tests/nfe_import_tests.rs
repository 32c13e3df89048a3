//! NF-e invoice extraction tests

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use estoque_backend::error::AppError;
use estoque_backend::services::nfe::parse_nfe;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const SAMPLE_NFE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe35240111222333000181550010000012341000012349" versao="4.00">
      <ide>
        <nNF>1234</nNF>
        <dhEmi>2024-01-15T10:30:00-03:00</dhEmi>
      </ide>
      <emit>
        <CNPJ>11222333000181</CNPJ>
        <xNome>Fornecedora Alfa Ltda</xNome>
        <enderEmit>
          <xLgr>Rua das Flores</xLgr>
          <nro>100</nro>
          <xBairro>Centro</xBairro>
          <xMun>Sao Paulo</xMun>
          <UF>SP</UF>
          <fone>1133334444</fone>
        </enderEmit>
        <email>contato@alfa.com.br</email>
      </emit>
      <det nItem="1">
        <prod>
          <cProd>P001</cProd>
          <xProd>Parafuso Sextavado M8</xProd>
          <qCom>100.0000</qCom>
          <vUnCom>0.5000</vUnCom>
          <uCom>UN</uCom>
        </prod>
      </det>
      <det nItem="2">
        <prod>
          <cProd>P002</cProd>
          <xProd>Arruela Lisa M8</xProd>
          <qCom>200.0000</qCom>
          <vUnCom>0.1000</vUnCom>
          <uCom>CX</uCom>
        </prod>
      </det>
      <total>
        <ICMSTot>
          <vNF>70.00</vNF>
        </ICMSTot>
      </total>
    </infNFe>
  </NFe>
</nfeProc>"#;

#[test]
fn test_extracts_emitter_data() {
    let import = parse_nfe(SAMPLE_NFE).unwrap();

    assert_eq!(import.company.cnpj, "11222333000181");
    assert_eq!(import.company.name, "Fornecedora Alfa Ltda");
    assert_eq!(import.company.phone.as_deref(), Some("1133334444"));
    assert_eq!(import.company.email.as_deref(), Some("contato@alfa.com.br"));
    assert_eq!(
        import.company.address.as_deref(),
        Some("Rua das Flores, 100 - Centro - Sao Paulo/SP")
    );
}

#[test]
fn test_extracts_invoice_header() {
    let import = parse_nfe(SAMPLE_NFE).unwrap();

    assert_eq!(import.movement.nfe, "1234");
    assert_eq!(
        import.movement.date,
        NaiveDate::from_ymd_opt(2024, 1, 15)
    );
    assert_eq!(import.movement.total_value, dec("70.00"));
    assert_eq!(import.movement.xml_path, None);
}

#[test]
fn test_extracts_product_lines_with_totals() {
    let import = parse_nfe(SAMPLE_NFE).unwrap();

    assert_eq!(import.products.len(), 2);

    let first = &import.products[0];
    assert_eq!(first.code, "P001");
    assert_eq!(first.name, "Parafuso Sextavado M8");
    assert_eq!(first.unit, "UN");
    assert_eq!(first.quantity, dec("100.0000"));
    assert_eq!(first.price, dec("0.5000"));
    assert_eq!(first.total, Some(dec("100.0000") * dec("0.5000")));

    let second = &import.products[1];
    assert_eq!(second.code, "P002");
    assert_eq!(second.unit, "CX");
}

#[test]
fn test_tolerates_unprefixed_minimal_document() {
    let xml = r#"<NFe><infNFe><ide><nNF>55</nNF></ide><emit><CNPJ>11222333000181</CNPJ><xNome>Beta</xNome></emit></infNFe></NFe>"#;

    let import = parse_nfe(xml).unwrap();

    assert_eq!(import.movement.nfe, "55");
    assert_eq!(import.movement.date, None);
    assert_eq!(import.movement.total_value, Decimal::ZERO);
    assert_eq!(import.company.name, "Beta");
    assert_eq!(import.company.address, None);
    assert!(import.products.is_empty());
}

#[test]
fn test_drops_product_lines_without_usable_quantity() {
    let xml = r#"<NFe><infNFe>
      <det><prod><cProd>P1</cProd><xProd>Item</xProd><qCom>abc</qCom><vUnCom>1.00</vUnCom></prod></det>
      <det><prod><cProd>P2</cProd><xProd>Outro</xProd><qCom>3</qCom><vUnCom>2.00</vUnCom></prod></det>
    </infNFe></NFe>"#;

    let import = parse_nfe(xml).unwrap();

    // Unparseable quantity reads as zero, which makes the line incomplete
    assert_eq!(import.products.len(), 1);
    assert_eq!(import.products[0].code, "P2");
    assert_eq!(import.products[0].total, Some(dec("6.00")));
}

#[test]
fn test_rejects_xml_without_inf_nfe() {
    let result = parse_nfe("<invoice><number>1</number></invoice>");

    assert!(matches!(result, Err(AppError::InvalidXml(_))));
}

#[test]
fn test_rejects_malformed_xml() {
    let result = parse_nfe("<NFe><infNFe><ide></NFe>");

    assert!(matches!(result, Err(AppError::InvalidXml(_))));
}
