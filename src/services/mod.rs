pub mod checkout;
pub mod mercado_pago;
