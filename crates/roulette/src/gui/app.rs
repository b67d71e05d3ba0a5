use crate::config;
use crate::events::AppEvent;
use crate::gui::status::Rejection;
use crate::gui::table::{self, WheelMetrics};
use crate::gui::theme::{self, ThemeColors};
use croupier::funding::{AccountId, Faucet};
use croupier::{
    BetError, BetUnit, Chips, Game, Label, Point, Settlement, ViewportClass,
};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

const DEFAULT_WIDTH: i32 = 1280;
const DEFAULT_HEIGHT: i32 = 860;

pub struct AppModel {
    pub game: Rc<RefCell<Game>>,
    pub status: String,
    pub faucet: Faucet,
    pub wheel_area: gtk::DrawingArea,
    pub table_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerDown(Point),
    Bet(Label),
    SetUnit(BetUnit),
    Spin,
    Settled(Settlement),
    Clear,
    Fund(AccountId),
    Resize(i32, i32),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Spin => AppMsg::Spin,
            AppEvent::Clear => AppMsg::Clear,
            AppEvent::Bet(label) => AppMsg::Bet(label),
            AppEvent::Unit(unit) => AppMsg::SetUnit(unit),
            AppEvent::Fund(account) => AppMsg::Fund(account),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn balance_text(&self) -> String {
        format!("Balance: ${}", self.game.borrow().balance())
    }

    fn staked_text(&self) -> String {
        format!("Total bet: ${}", self.game.borrow().staked())
    }

    fn last_number_text(&self) -> String {
        let game = self.game.borrow();
        match game.last_settlement() {
            Some(s) => format!("Last number: {} ({})", s.winning.label, s.winning.color),
            None => "Last number: -".to_string(),
        }
    }

    fn unit_selected(&self, unit: BetUnit) -> bool {
        self.game.borrow().bet_unit() == unit
    }

    fn is_spinning(&self) -> bool {
        self.game.borrow().is_spinning()
    }

    fn redraw(&self) {
        self.wheel_area.queue_draw();
        self.table_area.queue_draw();
    }

    fn report_bet(&mut self, result: Result<Option<(Chips, Label)>, BetError>) {
        match result {
            Ok(Some((amount, label))) => {
                self.status = format!("${} on {}", amount, label);
                self.table_area.queue_draw();
            }
            Ok(None) => {}
            Err(e) => self.reject(&e),
        }
    }

    fn reject(&mut self, rejection: &impl Rejection) {
        log::warn!("Rejected: {}", rejection);
        self.status = rejection.status_text();
    }

    /// Drives the spin from the wheel's frame clock, one step per frame.
    fn start_frame_driver(&self, sender: ComponentSender<Self>) {
        let game = self.game.clone();
        self.wheel_area.add_tick_callback(move |area, _| {
            let settlement = {
                let mut game = game.borrow_mut();
                if !game.is_spinning() {
                    return glib::ControlFlow::Break;
                }
                game.tick()
            };
            area.queue_draw();
            match settlement {
                Some(settlement) => {
                    sender.input(AppMsg::Settled(settlement));
                    glib::ControlFlow::Break
                }
                None => glib::ControlFlow::Continue,
            }
        });
    }

    fn resize(&mut self, width: i32, height: i32) {
        let forced = self.game.borrow().config().viewport;
        let viewport =
            forced.unwrap_or_else(|| ViewportClass::classify(width as f64, height as f64));
        self.game.borrow_mut().relayout(viewport);

        let extent = WheelMetrics::for_viewport(viewport).extent();
        self.wheel_area.set_content_width(extent);
        self.wheel_area.set_content_height(extent);

        let canvas = self.game.borrow().grid().canvas();
        self.table_area.set_content_width(canvas.width as i32);
        self.table_area.set_content_height(canvas.height as i32);
        self.redraw();
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Game, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Roulette"),
            set_default_width: DEFAULT_WIDTH,
            set_default_height: DEFAULT_HEIGHT,
            add_css_class: "roulette-window",

            connect_default_width_notify[sender] => move |window| {
                sender.input(AppMsg::Resize(window.default_width(), window.default_height()));
            },
            connect_default_height_notify[sender] => move |window| {
                sender.input(AppMsg::Resize(window.default_width(), window.default_height()));
            },

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::space => sender.input(AppMsg::Spin),
                        gtk::gdk::Key::Escape => sender.input(AppMsg::Clear),
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 12,
                set_margin_all: 12,

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 24,
                    set_halign: gtk::Align::Center,
                    add_css_class: "roulette-stats",

                    gtk::Label {
                        #[watch]
                        set_label: &model.balance_text(),
                    },
                    gtk::Label {
                        #[watch]
                        set_label: &model.staked_text(),
                    },
                    gtk::Label {
                        #[watch]
                        set_label: &model.last_number_text(),
                    },
                },

                #[name = "wheel_area"]
                gtk::DrawingArea {
                    set_halign: gtk::Align::Center,
                },

                #[name = "table_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,

                    add_controller = gtk::GestureClick {
                        connect_pressed[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::PointerDown(Point::new(x, y)));
                        }
                    }
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 8,
                    set_halign: gtk::Align::Center,

                    gtk::Button {
                        set_label: "$10",
                        #[watch]
                        set_class_active: ("suggested-action", model.unit_selected(BetUnit::Ten)),
                        connect_clicked => AppMsg::SetUnit(BetUnit::Ten),
                    },
                    gtk::Button {
                        set_label: "$20",
                        #[watch]
                        set_class_active: ("suggested-action", model.unit_selected(BetUnit::Twenty)),
                        connect_clicked => AppMsg::SetUnit(BetUnit::Twenty),
                    },
                    gtk::Button {
                        set_label: "$50",
                        #[watch]
                        set_class_active: ("suggested-action", model.unit_selected(BetUnit::Fifty)),
                        connect_clicked => AppMsg::SetUnit(BetUnit::Fifty),
                    },
                    gtk::Button {
                        set_label: "$100",
                        #[watch]
                        set_class_active: ("suggested-action", model.unit_selected(BetUnit::Hundred)),
                        connect_clicked => AppMsg::SetUnit(BetUnit::Hundred),
                    },

                    gtk::Separator {
                        set_orientation: gtk::Orientation::Vertical,
                    },

                    gtk::Button {
                        set_label: "Spin",
                        add_css_class: "suggested-action",
                        #[watch]
                        set_sensitive: !model.is_spinning(),
                        connect_clicked => AppMsg::Spin,
                    },
                    gtk::Button {
                        set_label: "Clear Bets",
                        add_css_class: "destructive-action",
                        #[watch]
                        set_sensitive: !model.is_spinning(),
                        connect_clicked => AppMsg::Clear,
                    },
                },

                gtk::Label {
                    add_css_class: "roulette-status",
                    #[watch]
                    set_label: &model.status,
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (game, rx) = init;

        theme::load_css();

        let model = AppModel {
            game: Rc::new(RefCell::new(game)),
            status: "Place your bets".to_string(),
            faucet: Faucet::default(),
            wheel_area: gtk::DrawingArea::default(),
            table_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.wheel_area = widgets.wheel_area.clone();
        model.table_area = widgets.table_area.clone();

        let game_draw = model.game.clone();
        widgets
            .wheel_area
            .set_draw_func(move |area, cr, _, _| {
                let colors = ThemeColors::from_context(&area.style_context());
                let game = game_draw.borrow();
                let metrics = WheelMetrics::for_viewport(game.grid().viewport());
                if let Err(e) = table::draw_wheel(cr, &game.snapshot(), &metrics, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let game_draw = model.game.clone();
        widgets
            .table_area
            .set_draw_func(move |area, cr, width, height| {
                let colors = ThemeColors::from_context(&area.style_context());
                let game = game_draw.borrow();
                let origin =
                    table::table_origin(game.grid().canvas(), width as f64, height as f64);
                if let Err(e) = table::draw_table(cr, &game.snapshot(), origin, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        sender.input(AppMsg::Resize(DEFAULT_WIDTH, DEFAULT_HEIGHT));

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::PointerDown(point) => {
                let origin = table::table_origin(
                    self.game.borrow().grid().canvas(),
                    self.table_area.width() as f64,
                    self.table_area.height() as f64,
                );
                let result = self
                    .game
                    .borrow_mut()
                    .pointer_down(table::to_table(point, origin))
                    .map(|bet| bet.map(|b| (b.amount, b.cell.label.clone())));
                self.report_bet(result);
            }
            AppMsg::Bet(label) => {
                let result = self
                    .game
                    .borrow_mut()
                    .place(label.as_str())
                    .map(|b| Some((b.amount, b.cell.label.clone())));
                self.report_bet(result);
            }
            AppMsg::SetUnit(unit) => {
                self.game.borrow_mut().set_bet_unit(unit);
            }
            AppMsg::Spin => {
                let result = self.game.borrow_mut().request_spin();
                match result {
                    Ok(()) => {
                        self.status = "No more bets!".to_string();
                        self.start_frame_driver(sender);
                    }
                    Err(e) => self.reject(&e),
                }
            }
            AppMsg::Settled(settlement) => {
                let winning = &settlement.winning;
                self.status = if settlement.is_win() {
                    format!(
                        "{} {}. Congratulations! You won ${}!",
                        winning.label, winning.color, settlement.payout
                    )
                } else {
                    format!("{} {}. Better luck next time!", winning.label, winning.color)
                };
                self.redraw();
            }
            AppMsg::Clear => {
                let result = self.game.borrow_mut().clear_bets();
                match result {
                    Ok(0) => {}
                    Ok(refund) => {
                        self.status = format!("Bets cleared, ${} returned", refund);
                        self.table_area.queue_draw();
                    }
                    Err(e) => self.reject(&e),
                }
            }
            AppMsg::Fund(account) => {
                let result = self.game.borrow_mut().fund(&mut self.faucet, &account);
                match result {
                    Ok(granted) => {
                        log::info!("Funded {} with {}", account, granted);
                        self.status = format!("${} added to your balance", granted);
                    }
                    Err(e) => self.reject(&e),
                }
            }
            AppMsg::Resize(width, height) => self.resize(width, height),
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    let result = self.game.borrow_mut().reconfigure(new_config);
                    match result {
                        Ok(()) => {
                            log::info!("Configuration reloaded");
                            let (width, height) = (
                                self.table_area.root().map_or(DEFAULT_WIDTH, |r| r.width()),
                                self.table_area.root().map_or(DEFAULT_HEIGHT, |r| r.height()),
                            );
                            self.resize(width, height);
                        }
                        Err(e) => log::error!("Rejected reloaded config: {}", e),
                    }
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
