// comanda-client/examples/place_order.rs
// Place a delivery order against a running backend and print the receipt

use comanda_client::{
    CartLine, CheckoutContext, ClientConfig, ClientIdentity, OrderKind, PaymentMode,
    fetch_placed_orders, place_order,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let base_url =
        std::env::var("COMANDA_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let client_id =
        std::env::var("COMANDA_CLIENT_ID").unwrap_or_else(|_| "demo-client".to_string());

    let mut config = ClientConfig::new(&base_url);
    if let Ok(token) = std::env::var("COMANDA_TOKEN") {
        config = config.with_token(token);
    }
    let backend = config.build_backend();

    // A small mixed cart: food is vatable, bottled water is exempt
    let cart = vec![
        CartLine::new("ITM-0001", "Lamb plate", 2, Decimal::new(1000, 0)),
        CartLine::new("ITM-0002", "Bottled water", 1, Decimal::new(500, 0))
            .with_uom("Bottle")
            .vat_exempt(),
    ];

    let ctx = CheckoutContext::new(
        ClientIdentity::new(&client_id, "Demo Client"),
        cart,
        OrderKind::Delivery,
    )
    .with_delivery_address("12 Calle Norte")
    .with_contact_phone("555-0142")
    .with_payment_mode(PaymentMode::PayOnDelivery);

    let receipt = place_order(&backend, &config, &ctx).await?;
    tracing::info!(
        order_number = %receipt.order_number,
        subtotal = %receipt.totals.subtotal_excl_vat,
        vat = %receipt.totals.vat_amount,
        total = %receipt.totals.total_incl_vat,
        "Order placed"
    );

    let tracking = receipt.initial_tracking();
    println!(
        "Order {} placed: {} {} ({} lines), status: {}",
        receipt.order_number,
        receipt.totals.total_incl_vat,
        receipt.currency,
        receipt.lines_saved,
        tracking.current_label(),
    );

    // Show this client's history with translated statuses
    match fetch_placed_orders(&backend, &client_id).await {
        Ok(orders) => {
            for order in orders {
                println!(
                    "  {} {} {} {} ({:.0}%)",
                    order.order_no,
                    order.placed_at,
                    order.total_incl_vat,
                    order.status_label(),
                    order.progress * 100.0,
                );
            }
        }
        Err(e) => tracing::warn!("Could not fetch order history: {e}"),
    }

    Ok(())
}
